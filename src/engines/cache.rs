// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// 缓存的页面
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    /// 最终 URL
    pub url: String,
    /// 渲染后的 HTML
    pub html: String,
    /// 截图（base64）
    pub screenshot: Option<String>,
}

struct Entry {
    page: CachedPage,
    stored_at: Instant,
}

/// 渲染结果缓存
///
/// 以请求 URL 为键保存渲染后的 HTML。清洗和 Markdown 转换不缓存，
/// 每次按当前运行配置重新处理。
pub struct PageCache {
    inner: Option<Mutex<LruCache<String, Entry>>>,
    ttl: Duration,
}

impl PageCache {
    /// 创建缓存，`capacity` 为 0 时缓存关闭
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            ttl,
        }
    }

    /// 关闭的缓存
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// 读取缓存，过期条目会被移除
    pub fn get(&self, key: &str) -> Option<CachedPage> {
        let mut cache = self.inner.as_ref()?.lock();
        let expired = match cache.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                return Some(entry.page.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            cache.pop(key);
        }
        None
    }

    pub fn put(&self, key: impl Into<String>, page: CachedPage) {
        if let Some(inner) = &self.inner {
            inner.lock().put(
                key.into(),
                Entry {
                    page,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |c| c.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
