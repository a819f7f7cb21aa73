// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::crawl_config::{BrowserConfig, CrawlerRunConfig};
use crate::domain::models::crawl_result::CrawlResult;
use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
///
/// 只表示浏览器层面的故障；页面无法访问等情况以 `CrawlResult { success: false }` 返回
#[derive(Error, Debug)]
pub enum EngineError {
    /// 浏览器启动或连接失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// CDP 协议通信失败
    #[error("Browser protocol error: {0}")]
    Protocol(String),
    /// 爬取过程中发生 panic
    #[error("Crawl panicked: {0}")]
    Panicked(String),
}

impl EngineError {
    /// 错误分类，用于响应体和日志
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Launch(_) => "browser_launch",
            EngineError::Protocol(_) => "browser_protocol",
            EngineError::Panicked(_) => "panic",
        }
    }
}

impl From<chromiumoxide::error::CdpError> for EngineError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        EngineError::Protocol(err.to_string())
    }
}

/// 浏览器启动器特质
///
/// 每次调用 `launch` 都返回一个独占的新会话
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// 启动浏览器会话
    async fn launch(&self, config: &BrowserConfig) -> Result<Box<dyn CrawlSession>, EngineError>;

    /// 启动器名称
    fn name(&self) -> &'static str;
}

/// 浏览器会话特质
#[async_trait]
pub trait CrawlSession: Send {
    /// 抓取单个 URL
    async fn crawl(
        &mut self,
        url: &str,
        config: &CrawlerRunConfig,
    ) -> Result<CrawlResult, EngineError>;

    /// 关闭会话并释放浏览器
    async fn close(self: Box<Self>) -> Result<(), EngineError>;
}
