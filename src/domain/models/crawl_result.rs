// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 爬取结果实体
///
/// 由浏览器会话产出。`success` 与 `error_message` 反映会话自身对本次
/// 抓取是否成功的判断，上层不做二次解释。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlResult {
    /// 页面是否被成功获取并处理
    pub success: bool,
    /// 最终 URL（跟随重定向后）
    pub url: String,
    /// 渲染后的原始 HTML
    pub html: Option<String>,
    /// 清洗后的 HTML
    pub cleaned_html: Option<String>,
    /// 由清洗后 HTML 生成的 Markdown
    pub markdown: Option<String>,
    /// 结构化提取结果
    pub extracted_content: Option<Value>,
    /// 失败原因
    pub error_message: Option<String>,
    /// 截图数据（base64 编码的 PNG）
    pub screenshot: Option<String>,
}

impl CrawlResult {
    /// 构造一个失败结果
    pub fn failure(url: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: url.into(),
            error_message: Some(error_message.into()),
            ..Default::default()
        }
    }
}
