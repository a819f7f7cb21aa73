// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 只包含模型：浏览器启动配置、单次运行配置以及爬取结果。
/// 不依赖 HTTP 层，也不依赖具体的浏览器实现。
pub mod models;
