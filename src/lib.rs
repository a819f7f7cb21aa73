// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 请求数据传输对象与爬取用例（配置翻译与调度）
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 浏览器配置、运行配置与爬取结果
pub mod domain;

/// 引擎模块
///
/// 浏览器会话抽象、Chromium 实现、内容清洗与页面缓存
pub mod engines;

/// 基础设施模块
///
/// 指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和中间件
pub mod presentation;

/// 工具模块
///
/// 日志初始化与 URL 校验
pub mod utils;
