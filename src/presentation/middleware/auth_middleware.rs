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

use crate::config::settings::AuthSettings;
use crate::presentation::errors::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// 携带调用方密钥的请求头
pub const SECRET_HEADER: &str = "x-c4a-secret";

/// 认证状态
///
/// 启动时构建一次，之后只读
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    secret: Option<Arc<str>>,
}

impl AuthState {
    /// 空字符串表示关闭认证
    pub fn new(secret: &str) -> Self {
        Self {
            secret: (!secret.is_empty()).then(|| Arc::from(secret)),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(&settings.secret)
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// 校验调用方提供的密钥（逐字节精确匹配）
    pub fn verify(&self, supplied: Option<&[u8]>) -> bool {
        match &self.secret {
            None => true,
            Some(secret) => supplied == Some(secret.as_bytes()),
        }
    }
}

/// 认证中间件
///
/// 配置了密钥时，`x-c4a-secret` 缺失或不匹配返回 401，请求体不会被解析
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
pub async fn auth_middleware(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let supplied = req.headers().get(SECRET_HEADER).map(|v| v.as_bytes());

    if !state.verify(supplied) {
        warn!(
            path = req.uri().path(),
            header_present = supplied.is_some(),
            "Rejected request with invalid secret"
        );
        return Err(AppError::Unauthorized);
    }

    debug!("AuthMiddleware admitted request to {}", req.uri().path());
    Ok(next.run(req).await)
}
