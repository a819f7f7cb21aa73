// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 `/crawl` 的请求体与响应体
pub mod crawl_request;
pub mod crawl_response;
