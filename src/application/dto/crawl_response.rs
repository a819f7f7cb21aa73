// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::models::crawl_result::CrawlResult;

/// 爬取响应数据传输对象
///
/// 固定的七个字段，缺失值序列化为 null。`success` 为 false 时
/// HTTP 状态码仍为 200，调用方需同时检查 `error_message`。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CrawlResponseDto {
    pub success: bool,
    pub url: String,
    pub html: Option<String>,
    pub cleaned_html: Option<String>,
    pub markdown: Option<String>,
    pub extracted_content: Option<Value>,
    pub error_message: Option<String>,
}

impl From<CrawlResult> for CrawlResponseDto {
    fn from(result: CrawlResult) -> Self {
        Self {
            success: result.success,
            url: result.url,
            html: result.html,
            cleaned_html: result.cleaned_html,
            markdown: result.markdown,
            extracted_content: result.extracted_content,
            error_message: result.error_message,
        }
    }
}
