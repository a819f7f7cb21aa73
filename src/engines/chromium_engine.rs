// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::domain::models::crawl_config::{BrowserConfig, CrawlerRunConfig};
use crate::domain::models::crawl_result::CrawlResult;
use crate::engines::cache::{CachedPage, PageCache};
use crate::engines::content;
use crate::engines::traits::{BrowserLauncher, CrawlSession, EngineError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig as ChromeConfig, Page};
use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Chromium 启动器
///
/// 每个会话启动一个独立的无头 Chromium 进程；配置了远程调试地址时改为连接远程实例。
/// 渲染结果缓存在所有会话之间共享。
pub struct ChromiumLauncher {
    settings: BrowserSettings,
    cache: Arc<PageCache>,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings, cache: Arc<PageCache>) -> Self {
        Self { settings, cache }
    }

    fn chrome_config(&self, config: &BrowserConfig) -> Result<ChromeConfig, EngineError> {
        let mut builder = ChromeConfig::builder().request_timeout(self.settings.request_timeout());

        if !config.headless {
            builder = builder.with_head();
        }
        if self.settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &self.settings.executable {
            builder = builder.chrome_executable(path);
        }
        if config.verbose {
            builder = builder.arg("--enable-logging=stderr").arg("--v=1");
        }

        // Production environment setup
        builder = builder.arg("--disable-gpu").arg("--disable-dev-shm-usage");

        builder.build().map_err(EngineError::Launch)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, config: &BrowserConfig) -> Result<Box<dyn CrawlSession>, EngineError> {
        let target = match &self.settings.remote_debugging_url {
            Some(url) => BrowserTarget::Remote(url.clone()),
            None => BrowserTarget::Local(self.chrome_config(config)?),
        };

        Ok(Box::new(ChromiumSession {
            target: Some(target),
            running: None,
            page_timeout: self.settings.page_timeout(),
            cache: self.cache.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

enum BrowserTarget {
    Local(ChromeConfig),
    Remote(String),
}

struct RunningBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
    remote: bool,
}

async fn start_browser(target: BrowserTarget) -> Result<RunningBrowser, EngineError> {
    let (browser, mut handler, remote) = match target {
        BrowserTarget::Remote(url) => {
            info!("Connecting to remote Chrome instance at: {}", url);
            let (browser, handler) = Browser::connect(url.as_str()).await.map_err(|e| {
                EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e))
            })?;
            (browser, handler, true)
        }
        BrowserTarget::Local(config) => {
            let (browser, handler) = Browser::launch(config)
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?;
            (browser, handler, false)
        }
    };

    // Drive CDP events for the lifetime of the session
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    Ok(RunningBrowser {
        browser,
        handler_task,
        remote,
    })
}

#[derive(Debug)]
enum FetchOutcome {
    Loaded(CachedPage),
    Failed(String),
}

/// 页面来源
#[async_trait]
trait PageFetcher: Send {
    async fn fetch(&mut self, url: &str, screenshot: bool) -> Result<FetchOutcome, EngineError>;
}

/// 按缓存模式读取缓存，未命中时抓取
///
/// 没有截图的缓存页面不能满足截图请求。只有成功加载的页面会写入缓存。
async fn load_page<F>(
    cache: &PageCache,
    fetcher: &mut F,
    url: &str,
    config: &CrawlerRunConfig,
) -> Result<FetchOutcome, EngineError>
where
    F: PageFetcher + ?Sized,
{
    if config.cache_mode.should_read() {
        let cached = cache
            .get(url)
            .filter(|page| !config.screenshot || page.screenshot.is_some());
        if let Some(page) = cached {
            debug!("Cache hit for {}", url);
            return Ok(FetchOutcome::Loaded(page));
        }
    }

    let outcome = fetcher.fetch(url, config.screenshot).await?;
    if let FetchOutcome::Loaded(page) = &outcome {
        if config.cache_mode.should_write() {
            cache.put(url, page.clone());
        }
    }
    Ok(outcome)
}

/// Chromium 会话
///
/// 浏览器在第一次需要抓取时才启动，缓存命中不会启动 Chromium。
pub struct ChromiumSession {
    target: Option<BrowserTarget>,
    running: Option<RunningBrowser>,
    page_timeout: Duration,
    cache: Arc<PageCache>,
}

impl ChromiumSession {
    async fn browser(&mut self) -> Result<&Browser, EngineError> {
        let running = match self.running.take() {
            Some(running) => running,
            None => {
                let target = self.target.take().ok_or_else(|| {
                    EngineError::Launch("Browser session already shut down".to_string())
                })?;
                start_browser(target).await?
            }
        };
        Ok(&self.running.insert(running).browser)
    }
}

#[async_trait]
impl PageFetcher for ChromiumSession {
    async fn fetch(&mut self, url: &str, screenshot: bool) -> Result<FetchOutcome, EngineError> {
        let page_timeout = self.page_timeout;
        let page = self.browser().await?.new_page("about:blank").await?;

        let navigation = tokio::time::timeout(page_timeout, page.goto(url))
            .await
            .map(|loaded| loaded.map(|_| ()));

        let outcome = match navigation {
            Err(_) => FetchOutcome::Failed(format!(
                "Timeout after {}s while loading {}",
                page_timeout.as_secs(),
                url
            )),
            Ok(Err(e)) => FetchOutcome::Failed(format!("Failed to load {}: {}", url, e)),
            Ok(Ok(_)) => match read_page(&page, url, screenshot).await {
                Ok(loaded) => FetchOutcome::Loaded(loaded),
                Err(e) => {
                    let _ = page.close().await;
                    return Err(e);
                }
            },
        };

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }
        Ok(outcome)
    }
}

async fn read_page(page: &Page, url: &str, screenshot: bool) -> Result<CachedPage, EngineError> {
    let html = page.content().await?;
    let final_url = page.url().await?.unwrap_or_else(|| url.to_string());

    let screenshot = if screenshot {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        match page.screenshot(params).await {
            Ok(bytes) => Some(BASE64.encode(bytes)),
            Err(e) => {
                warn!("Page screenshot failed for {}: {}", url, e);
                None
            }
        }
    } else {
        None
    };

    Ok(CachedPage {
        url: final_url,
        html,
        screenshot,
    })
}

/// 按运行配置处理渲染结果
fn into_result(page: CachedPage, config: &CrawlerRunConfig) -> CrawlResult {
    match content::clean_html(
        &page.html,
        config.css_selector.as_deref(),
        config.word_count_threshold,
    ) {
        Ok(cleaned) => CrawlResult {
            success: true,
            url: page.url,
            markdown: content::to_markdown(&cleaned),
            cleaned_html: Some(cleaned),
            html: Some(page.html),
            extracted_content: None,
            error_message: None,
            screenshot: page.screenshot,
        },
        Err(e) => CrawlResult {
            html: Some(page.html),
            screenshot: page.screenshot,
            ..CrawlResult::failure(page.url, e.to_string())
        },
    }
}

#[async_trait]
impl CrawlSession for ChromiumSession {
    async fn crawl(
        &mut self,
        url: &str,
        config: &CrawlerRunConfig,
    ) -> Result<CrawlResult, EngineError> {
        let start = Instant::now();
        let cache = self.cache.clone();

        let page = match load_page(&cache, self, url, config).await? {
            FetchOutcome::Loaded(page) => page,
            FetchOutcome::Failed(message) => {
                warn!("{}", message);
                return Ok(CrawlResult::failure(url, message));
            }
        };

        let result = into_result(page, config);
        debug!(
            url = %result.url,
            success = result.success,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Crawl finished"
        );
        Ok(result)
    }

    async fn close(mut self: Box<Self>) -> Result<(), EngineError> {
        let Some(mut running) = self.running.take() else {
            return Ok(());
        };

        // Remote browsers are shared with other clients; only disconnect.
        let result = if running.remote {
            Ok(())
        } else {
            match running.browser.close().await {
                Ok(_) => {
                    let _ = running.browser.wait().await;
                    Ok(())
                }
                Err(e) => Err(EngineError::Protocol(e.to_string())),
            }
        };
        running.handler_task.abort();
        result
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.handler_task.abort();
        }
    }
}
