// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 请求/响应数据传输对象，以及把请求翻译成浏览器配置并调度一次爬取的用例
pub mod dto;
pub mod use_cases;
