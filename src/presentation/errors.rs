// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::application::use_cases::crawl_use_case::CrawlUseCaseError;
use crate::engines::traits::EngineError;

/// 应用错误类型
///
/// 响应体统一为 `{"detail": ...}`；浏览器故障额外带上 `kind`
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            // Fault details stay in the logs.
            AppError::Engine(e) => json!({ "detail": "Internal Server Error", "kind": e.kind() }),
            other => json!({ "detail": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<CrawlUseCaseError> for AppError {
    fn from(err: CrawlUseCaseError) -> Self {
        match err {
            CrawlUseCaseError::Forbidden(msg) => AppError::Forbidden(msg),
            CrawlUseCaseError::Engine(e) => AppError::Engine(e),
        }
    }
}
