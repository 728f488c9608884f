// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::usecases::scrape_job::ScrapeJobUseCase;
use crate::presentation::handlers::scrape_handler;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// 创建应用路由
///
/// # 返回值
///
/// 返回挂载了抓取用例的路由
pub fn routes(use_case: Arc<ScrapeJobUseCase>) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let scrape_routes = Router::new()
        .route("/scrape", get(scrape_handler::scrape_by_query))
        .route("/v1/scrape", post(scrape_handler::create_scrape))
        .layer(Extension(use_case));

    Router::new()
        .merge(public_routes)
        .merge(scrape_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 服务状态
pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Upwork scraper running",
    }))
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
