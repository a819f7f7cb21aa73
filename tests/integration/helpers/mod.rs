// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum_test::TestServer;
use crawlgate::application::use_cases::crawl_use_case::CrawlUseCase;
use crawlgate::domain::models::crawl_config::{BrowserConfig, CrawlerRunConfig};
use crawlgate::domain::models::crawl_result::CrawlResult;
use crawlgate::engines::traits::{BrowserLauncher, CrawlSession, EngineError};
use crawlgate::presentation::middleware::auth_middleware::AuthState;
use crawlgate::presentation::routes;
use parking_lot::Mutex;
use std::sync::Arc;

/// 假会话的行为
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub enum Behaviour {
    /// 返回成功结果
    Success,
    /// 返回 success=false 的结果
    Reported(String),
    /// 返回浏览器故障
    Fault,
    /// 启动失败
    LaunchFailure,
    /// 爬取时 panic
    Panic,
}

/// 记录下的调用
#[derive(Default, Debug)]
pub struct Calls {
    pub launches: Vec<BrowserConfig>,
    pub crawls: Vec<(String, CrawlerRunConfig)>,
    pub closes: usize,
}

pub struct FakeLauncher {
    behaviour: Behaviour,
    calls: Arc<Mutex<Calls>>,
}

struct FakeSession {
    behaviour: Behaviour,
    calls: Arc<Mutex<Calls>>,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, config: &BrowserConfig) -> Result<Box<dyn CrawlSession>, EngineError> {
        if let Behaviour::LaunchFailure = self.behaviour {
            return Err(EngineError::Launch("chrome executable not found".to_string()));
        }
        self.calls.lock().launches.push(config.clone());
        Ok(Box::new(FakeSession {
            behaviour: self.behaviour.clone(),
            calls: self.calls.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

#[async_trait]
impl CrawlSession for FakeSession {
    async fn crawl(
        &mut self,
        url: &str,
        config: &CrawlerRunConfig,
    ) -> Result<CrawlResult, EngineError> {
        self.calls
            .lock()
            .crawls
            .push((url.to_string(), config.clone()));

        match &self.behaviour {
            Behaviour::Success | Behaviour::LaunchFailure => Ok(CrawlResult {
                success: true,
                url: url.to_string(),
                html: Some("<html><body><h1>Example Domain</h1></body></html>".to_string()),
                cleaned_html: Some("<body><h1>Example Domain</h1></body>".to_string()),
                markdown: Some("# Example Domain".to_string()),
                extracted_content: None,
                error_message: None,
                screenshot: config.screenshot.then(|| "iVBORw0KGgo=".to_string()),
            }),
            Behaviour::Reported(message) => Ok(CrawlResult::failure(url, message.clone())),
            Behaviour::Fault => Err(EngineError::Protocol("websocket closed".to_string())),
            Behaviour::Panic => panic!("renderer crashed"),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), EngineError> {
        self.calls.lock().closes += 1;
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub calls: Arc<Mutex<Calls>>,
}

impl TestApp {
    pub fn crawl_count(&self) -> usize {
        self.calls.lock().crawls.len()
    }

    pub fn last_run_config(&self) -> CrawlerRunConfig {
        self.calls
            .lock()
            .crawls
            .last()
            .map(|(_, config)| config.clone())
            .expect("no crawl recorded")
    }
}

pub fn create_test_app(secret: &str, behaviour: Behaviour) -> TestApp {
    let calls = Arc::new(Mutex::new(Calls::default()));
    let launcher = FakeLauncher {
        behaviour,
        calls: calls.clone(),
    };
    let use_case = Arc::new(CrawlUseCase::new(Arc::new(launcher)));
    let app = routes::routes(use_case, AuthState::new(secret));

    TestApp {
        server: TestServer::new(app).unwrap(),
        calls,
    }
}
