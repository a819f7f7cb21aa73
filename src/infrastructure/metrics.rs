// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

pub const CRAWL_REQUESTS_TOTAL: &str = "crawlgate_crawl_requests_total";
pub const CRAWL_DURATION_SECONDS: &str = "crawlgate_crawl_duration_seconds";

/// 爬取请求的结果分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// 会话报告成功
    Success,
    /// 会话报告失败 (HTTP 200, success=false)
    Reported,
    /// 浏览器故障 (HTTP 500)
    Fault,
    /// 被安全策略拒绝
    Rejected,
}

impl CrawlOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlOutcome::Success => "success",
            CrawlOutcome::Reported => "reported_failure",
            CrawlOutcome::Fault => "fault",
            CrawlOutcome::Rejected => "rejected",
        }
    }
}

/// 启动 Prometheus 导出器
///
/// 未启用时什么都不做；端口被占用时只记录警告。
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                "Invalid metrics listen address {}: {}",
                settings.listen_addr, e
            );
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(CRAWL_REQUESTS_TOTAL, "Crawl requests by outcome");
    describe_histogram!(CRAWL_DURATION_SECONDS, "Wall-clock time of a crawl dispatch");

    info!("Metrics exporter listening on {}", addr);
}

/// 记录一次爬取
pub fn record_crawl(outcome: CrawlOutcome, elapsed: Duration) {
    counter!(CRAWL_REQUESTS_TOTAL, "outcome" => outcome.as_str()).increment(1);
    histogram!(CRAWL_DURATION_SECONDS).record(elapsed.as_secs_f64());
}
