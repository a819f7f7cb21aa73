// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 爬取配置（crawl_config）：浏览器启动配置与单次运行配置
/// - 爬取结果（crawl_result）：浏览器会话返回的结果
pub mod crawl_config;
pub mod crawl_result;
