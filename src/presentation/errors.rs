// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::models::scrape_target::TargetError;

/// 请求体或查询串无法解码
#[derive(Error, Debug)]
pub enum InputRejection {
    #[error("Invalid JSON body: {}", .0.body_text())]
    Json(#[from] JsonRejection),
    #[error("Invalid query string: {}", .0.body_text())]
    Query(#[from] QueryRejection),
}

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let is_bad_input = self.0.downcast_ref::<TargetError>().is_some()
            || self.0.downcast_ref::<ValidationErrors>().is_some()
            || self.0.downcast_ref::<InputRejection>().is_some();

        let (status, kind) = if is_bad_input {
            (StatusCode::BAD_REQUEST, "invalid_input")
        } else {
            error!(error = %error_message, "Unhandled error while serving request");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        };

        let body = Json(json!({
            "success": false,
            "error": kind,
            "message": error_message,
        }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
