// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::engines::content::parse_selector;
use crate::utils::validators::parse_crawl_url;

/// 爬取请求数据传输对象
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CrawlRequestDto {
    /// 要爬取的网页URL (绝对 http/https 地址)
    #[validate(custom(function = "validate_crawl_url"))]
    pub url: String,
    /// 爬取选项，缺省或为 null 时全部取默认值
    #[serde(default)]
    #[validate(nested)]
    pub config: Option<CrawlConfigDto>,
}

/// 爬取选项
///
/// 未识别的键会被忽略
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CrawlConfigDto {
    /// 缓存模式，"bypass"（不区分大小写）跳过缓存，其余取默认模式
    #[serde(default)]
    pub cache_mode: Option<String>,
    /// 限定内容范围的 CSS 选择器
    #[serde(default)]
    #[validate(custom(function = "validate_css_selector"))]
    pub css_selector: Option<String>,
    /// 文本块最小词数，默认 10
    #[serde(default)]
    pub word_count_threshold: Option<usize>,
    /// 是否截图，默认 false
    #[serde(default, deserialize_with = "lenient_bool")]
    pub screenshot: Option<bool>,
}

fn validate_crawl_url(url: &str) -> Result<(), ValidationError> {
    parse_crawl_url(url).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("url");
        error.message = Some(e.to_string().into());
        error
    })
}

fn validate_css_selector(selector: &str) -> Result<(), ValidationError> {
    parse_selector(selector).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("css_selector");
        error.message = Some(e.to_string().into());
        error
    })
}

/// 宽松的布尔值解析：接受布尔、数字以及常见的真/假字符串
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => Ok(Some(n.as_f64().is_some_and(|f| f != 0.0))),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" | "" => Ok(Some(false)),
            other => Err(de::Error::custom(format!(
                "invalid boolean value: {}",
                other
            ))),
        },
        Some(other) => Err(de::Error::custom(format!(
            "invalid boolean value: {}",
            other
        ))),
    }
}
