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

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Json, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    application::dto::{
        scrape_request::ScrapeRequestDto,
        scrape_response::{ScrapeFailureDto, ScrapeSuccessDto},
    },
    application::usecases::scrape_job::ScrapeJobUseCase,
    domain::models::scrape_result::ScrapeResult,
    domain::models::scrape_target::ScrapeTarget,
    infrastructure::observability::metrics,
    presentation::errors::{AppError, InputRejection},
};

/// `GET /scrape?jobId=..&url=..`
pub async fn scrape_by_query(
    Extension(use_case): Extension<Arc<ScrapeJobUseCase>>,
    request: Result<Query<ScrapeRequestDto>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(request) = request.map_err(reject)?;
    run_scrape(use_case, request).await
}

/// `POST /v1/scrape`
pub async fn create_scrape(
    Extension(use_case): Extension<Arc<ScrapeJobUseCase>>,
    request: Result<Json<ScrapeRequestDto>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = request.map_err(reject)?;
    run_scrape(use_case, request).await
}

// Undecodable bodies and query strings share the invalid_input contract.
fn reject<E>(rejection: E) -> AppError
where
    E: Into<InputRejection>,
{
    metrics::record_request("invalid_input");
    let rejection: InputRejection = rejection.into();
    warn!(error = %rejection, "Rejected scrape request");
    rejection.into()
}

async fn run_scrape(
    use_case: Arc<ScrapeJobUseCase>,
    request: ScrapeRequestDto,
) -> Result<Response, AppError> {
    if let Err(e) = request.validate() {
        metrics::record_request("invalid_input");
        return Err(e.into());
    }

    let target = match use_case.resolve_target(&request) {
        Ok(target) => target,
        Err(e) => {
            metrics::record_request("invalid_input");
            warn!(error = %e, "Rejected scrape request");
            return Err(e.into());
        }
    };

    info!(job_url = %target.normalized_url(), "Scrape requested");

    // The scrape runs on its own task so a panic surfaces as a JoinError.
    let worker = Arc::clone(&use_case);
    let task_target = target.clone();
    let result = match tokio::spawn(async move { worker.execute(&task_target).await }).await {
        Ok(result) => result,
        Err(e) => {
            metrics::record_request("internal_error");
            return Err(anyhow::anyhow!("scrape task aborted: {}", e).into());
        }
    };

    Ok(render(&target, result))
}

fn render(target: &ScrapeTarget, result: ScrapeResult) -> Response {
    if result.success {
        if let Some(record) = result.record {
            metrics::record_request("success");
            return (
                StatusCode::OK,
                Json(ScrapeSuccessDto::new(target, record, result.attempts)),
            )
                .into_response();
        }
    }

    let status = match result.final_classification() {
        Some(classification) if classification.is_access_denial() => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    };
    metrics::record_request(if status == StatusCode::TOO_MANY_REQUESTS {
        "denied"
    } else {
        "failed"
    });

    let body = ScrapeFailureDto::new(target, result);
    warn!(
        job_url = %target.normalized_url(),
        error = %body.error,
        attempts = body.attempts.len(),
        "Scrape failed"
    );
    (status, Json(body)).into_response()
}
