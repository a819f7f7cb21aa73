// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 默认最小文本块词数
pub const DEFAULT_WORD_COUNT_THRESHOLD: usize = 10;

/// 浏览器内核类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    Chromium,
}

/// 浏览器启动配置
///
/// 固定策略：Chromium 内核、无头模式、关闭详细日志。调用方无法修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub browser_type: BrowserType,
    pub headless: bool,
    pub verbose: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            browser_type: BrowserType::Chromium,
            headless: true,
            verbose: false,
        }
    }
}

/// 缓存模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// 读取并写入缓存
    #[default]
    Default,
    /// 本次爬取既不读也不写缓存
    Bypass,
}

impl CacheMode {
    /// 解析调用方传入的缓存模式
    ///
    /// 只有 "bypass"（不区分大小写）映射为 `Bypass`，其余一律为 `Default`
    pub fn from_request(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("bypass") => CacheMode::Bypass,
            _ => CacheMode::Default,
        }
    }

    pub fn should_read(&self) -> bool {
        matches!(self, CacheMode::Default)
    }

    pub fn should_write(&self) -> bool {
        matches!(self, CacheMode::Default)
    }
}

/// 单次爬取运行配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlerRunConfig {
    /// 缓存模式
    pub cache_mode: CacheMode,
    /// 限定内容范围的 CSS 选择器，None 表示整页
    pub css_selector: Option<String>,
    /// 文本块保留所需的最小词数
    pub word_count_threshold: usize,
    /// 是否截图
    pub screenshot: bool,
}

impl Default for CrawlerRunConfig {
    fn default() -> Self {
        Self {
            cache_mode: CacheMode::Default,
            css_selector: None,
            word_count_threshold: DEFAULT_WORD_COUNT_THRESHOLD,
            screenshot: false,
        }
    }
}
