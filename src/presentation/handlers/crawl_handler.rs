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

use axum::{extract::Extension, Json};
use std::sync::Arc;

use crate::{
    application::{
        dto::{crawl_request::CrawlRequestDto, crawl_response::CrawlResponseDto},
        use_cases::crawl_use_case::CrawlUseCase,
    },
    presentation::{errors::AppError, extractors::validated_json::ValidatedJson},
};

/// 爬取单个 URL
///
/// 认证由中间件完成；请求体校验失败返回 422，浏览器故障返回 500，
/// 页面本身抓取失败仍返回 200 且 `success` 为 false。
pub async fn crawl(
    Extension(use_case): Extension<Arc<CrawlUseCase>>,
    ValidatedJson(payload): ValidatedJson<CrawlRequestDto>,
) -> Result<Json<CrawlResponseDto>, AppError> {
    let response = use_case.crawl(payload).await?;
    Ok(Json(response))
}
