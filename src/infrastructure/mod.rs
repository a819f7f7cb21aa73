// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 指标（metrics）：爬取请求计数与耗时，可选的 Prometheus 导出器
pub mod metrics;
