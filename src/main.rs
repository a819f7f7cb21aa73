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

use crawlgate::application::use_cases::crawl_use_case::CrawlUseCase;
use crawlgate::config::settings::{Settings, SECRET_ENV_VAR};
use crawlgate::engines::cache::PageCache;
use crawlgate::engines::chromium_engine::ChromiumLauncher;
use crawlgate::engines::traits::BrowserLauncher;
use crawlgate::presentation::middleware::auth_middleware::AuthState;
use crawlgate::presentation::routes;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crawlgate::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting crawlgate...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Initialize Prometheus Metrics
    crawlgate::infrastructure::metrics::init_metrics(&settings.metrics);

    // 4. Auth
    let auth_state = AuthState::from_settings(&settings.auth);
    if !auth_state.is_enabled() {
        warn!(
            "{} is not set: /crawl accepts unauthenticated requests",
            SECRET_ENV_VAR
        );
    }

    // 5. Initialize browser launcher and page cache
    let cache = Arc::new(PageCache::new(
        settings.cache.capacity,
        Duration::from_secs(settings.cache.ttl_secs),
    ));
    let cache_enabled = cache.is_enabled();
    let launcher: Arc<dyn BrowserLauncher> =
        Arc::new(ChromiumLauncher::new(settings.browser.clone(), cache));
    info!(
        launcher = launcher.name(),
        remote = settings.browser.remote_debugging_url.is_some(),
        cache_enabled,
        "Browser launcher initialized"
    );

    let use_case = Arc::new(
        CrawlUseCase::new(launcher)
            .with_private_network_blocking(settings.security.block_private_networks),
    );

    // 6. Start HTTP server
    let app = routes::routes(use_case, auth_state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
