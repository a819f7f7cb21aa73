// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_config::BrowserConfig;
use crate::engines::traits::{BrowserLauncher, CrawlSession, EngineError};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, warn};

/// 在一个作用域内使用浏览器会话
///
/// 先启动会话，再执行 `f`，无论 `f` 成功、返回错误还是 panic，都会关闭会话。
/// 关闭失败只记录日志，不覆盖 `f` 的结果。
pub async fn scoped<T, F>(
    launcher: &dyn BrowserLauncher,
    config: &BrowserConfig,
    f: F,
) -> Result<T, EngineError>
where
    F: for<'s> FnOnce(&'s mut Box<dyn CrawlSession>) -> BoxFuture<'s, Result<T, EngineError>>,
{
    let mut session = launcher.launch(config).await?;
    debug!(launcher = launcher.name(), "Browser session opened");

    let outcome = AssertUnwindSafe(f(&mut session)).catch_unwind().await;

    if let Err(e) = session.close().await {
        warn!(launcher = launcher.name(), error = %e, "Failed to close browser session");
    } else {
        debug!(launcher = launcher.name(), "Browser session closed");
    }

    match outcome {
        Ok(result) => result,
        Err(panic) => Err(EngineError::Panicked(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
