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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 共享密钥的环境变量名
pub const SECRET_ENV_VAR: &str = "C4A_SECRET";

/// 应用程序配置设置
///
/// 启动时加载一次，之后只读共享
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 认证配置
    pub auth: AuthSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 页面缓存配置
    pub cache: CacheSettings,
    /// 安全策略配置
    pub security: SecuritySettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 认证配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// 共享密钥，为空时关闭认证
    pub secret: String,
}

impl AuthSettings {
    /// 是否启用了认证
    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 远程 Chrome 调试地址 (ws://...)，设置后不再本地启动浏览器
    pub remote_debugging_url: Option<String>,
    /// Chrome 可执行文件路径，为空时自动探测
    pub executable: Option<String>,
    /// 是否以 --no-sandbox 启动 (容器内通常需要)
    pub no_sandbox: bool,
    /// CDP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 页面导航超时（秒）
    pub page_timeout_secs: u64,
}

impl BrowserSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

/// 页面缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// 最大缓存页面数，0 表示关闭缓存
    pub capacity: usize,
    /// 缓存条目存活时间（秒）
    pub ttl_secs: u64,
}

/// 安全策略配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySettings {
    /// 是否拒绝解析到私有/环回地址的目标 (SSRF 防护)
    ///
    /// 只检查请求的 URL 和跳转后的最终 URL。浏览器在跳转途中和加载子资源时
    /// 发出的请求不会被拦截，跳转到内网的请求仍会被发出，只是结果不会返回。
    pub block_private_networks: bool,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 加载顺序：内置默认值 → config/default.toml → config/{APP_ENVIRONMENT}.toml
    /// → CRAWLGATE__* 环境变量 → C4A_SECRET / PORT
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder(Some(&env))?
            .add_source(Environment::with_prefix("CRAWLGATE").separator("__"))
            .set_override_option(
                "auth.secret",
                std::env::var(SECRET_ENV_VAR).ok(),
            )?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置，不读取任何文件或环境变量
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder(None)?.build()?.try_deserialize()
    }

    fn builder(
        env: Option<&str>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let mut builder = Config::builder()
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            // Auth (empty = open endpoint)
            .set_default("auth.secret", "")?
            // Browser
            .set_default("browser.no_sandbox", true)?
            .set_default("browser.request_timeout_secs", 30)?
            .set_default("browser.page_timeout_secs", 60)?
            // Cache
            .set_default("cache.capacity", 128)?
            .set_default("cache.ttl_secs", 3600)?
            // Security
            .set_default("security.block_private_networks", false)?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?;

        if let Some(env) = env {
            builder = builder
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name(&format!("config/{}", env)).required(false));
        }

        Ok(builder)
    }
}
