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

use crate::{
    application::dto::{
        crawl_request::{CrawlConfigDto, CrawlRequestDto},
        crawl_response::CrawlResponseDto,
    },
    domain::models::crawl_config::{
        BrowserConfig, CacheMode, CrawlerRunConfig, DEFAULT_WORD_COUNT_THRESHOLD,
    },
    engines::{
        session,
        traits::{BrowserLauncher, EngineError},
    },
    infrastructure::metrics::{record_crawl, CrawlOutcome},
    utils::validators::ensure_public_url,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum CrawlUseCaseError {
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// 爬取用例
///
/// 把请求翻译成浏览器配置与运行配置，在一个作用域会话内执行恰好一次爬取，
/// 再把结果整理成响应。不重试，不限制并发。
pub struct CrawlUseCase {
    launcher: Arc<dyn BrowserLauncher>,
    block_private_networks: bool,
}

impl CrawlUseCase {
    pub fn new(launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            block_private_networks: false,
        }
    }

    /// 拒绝解析到私有网络的目标
    pub fn with_private_network_blocking(mut self, enabled: bool) -> Self {
        self.block_private_networks = enabled;
        self
    }

    pub async fn crawl(
        &self,
        request: CrawlRequestDto,
    ) -> Result<CrawlResponseDto, CrawlUseCaseError> {
        let start = Instant::now();
        let url = request.url.trim().to_string();

        if self.block_private_networks {
            if let Err(e) = ensure_public_url(&url).await {
                warn!("Rejected crawl of {}: {}", url, e);
                record_crawl(CrawlOutcome::Rejected, start.elapsed());
                return Err(CrawlUseCaseError::Forbidden(e.to_string()));
            }
        }

        let browser_config = BrowserConfig::default();
        let run_config = build_run_config(request.config.as_ref());
        info!(
            url = %url,
            cache_mode = ?run_config.cache_mode,
            css_selector = ?run_config.css_selector,
            word_count_threshold = run_config.word_count_threshold,
            screenshot = run_config.screenshot,
            "Dispatching crawl"
        );

        let target = url.clone();
        let outcome = session::scoped(self.launcher.as_ref(), &browser_config, move |session| {
            Box::pin(async move { session.crawl(&target, &run_config).await })
        })
        .await;

        match outcome {
            Ok(result) => {
                // Redirects are followed by the browser; recheck where it ended up.
                if self.block_private_networks && result.url != url {
                    if let Err(e) = ensure_public_url(&result.url).await {
                        warn!(
                            "Rejected crawl of {} redirected to {}: {}",
                            url, result.url, e
                        );
                        record_crawl(CrawlOutcome::Rejected, start.elapsed());
                        return Err(CrawlUseCaseError::Forbidden(e.to_string()));
                    }
                }

                let outcome = if result.success {
                    CrawlOutcome::Success
                } else {
                    CrawlOutcome::Reported
                };
                record_crawl(outcome, start.elapsed());
                info!(
                    url = %url,
                    success = result.success,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Crawl completed"
                );
                Ok(result.into())
            }
            Err(e) => {
                record_crawl(CrawlOutcome::Fault, start.elapsed());
                error!(url = %url, kind = e.kind(), "Crawl failed: {}", e);
                Err(e.into())
            }
        }
    }
}

/// 由请求选项构建运行配置
pub fn build_run_config(config: Option<&CrawlConfigDto>) -> CrawlerRunConfig {
    let Some(config) = config else {
        return CrawlerRunConfig::default();
    };

    CrawlerRunConfig {
        cache_mode: CacheMode::from_request(config.cache_mode.as_deref()),
        css_selector: config.css_selector.clone(),
        word_count_threshold: config
            .word_count_threshold
            .unwrap_or(DEFAULT_WORD_COUNT_THRESHOLD),
        screenshot: config.screenshot.unwrap_or(false),
    }
}
