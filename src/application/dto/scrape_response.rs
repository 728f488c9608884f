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

use serde::Serialize;

use crate::domain::models::attempt::AttemptOutcome;
use crate::domain::models::job_record::JobRecord;
use crate::domain::models::scrape_result::{ScrapeResult, EXTRACTION_FAILED, SCRAPE_FAILED};
use crate::domain::models::scrape_target::ScrapeTarget;

/// 抓取成功响应
#[derive(Debug, Serialize)]
pub struct ScrapeSuccessDto {
    pub success: bool,
    pub job_id: Option<String>,
    pub job_url: String,
    #[serde(flatten)]
    pub record: JobRecord,
    pub attempts: Vec<AttemptOutcome>,
}

/// 抓取失败响应
#[derive(Debug, Serialize)]
pub struct ScrapeFailureDto {
    pub success: bool,
    /// 分类字符串或 `extraction_failed` / `scrape_failed`
    pub error: String,
    pub message: String,
    pub input: String,
    pub job_url: String,
    pub attempts: Vec<AttemptOutcome>,
}

impl ScrapeSuccessDto {
    pub fn new(target: &ScrapeTarget, record: JobRecord, attempts: Vec<AttemptOutcome>) -> Self {
        Self {
            success: true,
            job_id: target.identifier().map(str::to_string),
            job_url: target.normalized_url().to_string(),
            record,
            attempts,
        }
    }
}

impl ScrapeFailureDto {
    pub fn new(target: &ScrapeTarget, result: ScrapeResult) -> Self {
        let error = result
            .final_error_kind
            .clone()
            .unwrap_or_else(|| SCRAPE_FAILED.to_string());
        let message = failure_message(&result, &error);

        Self {
            success: false,
            error,
            message,
            input: target.raw_input().to_string(),
            job_url: target.normalized_url().to_string(),
            attempts: result.attempts,
        }
    }
}

fn failure_message(result: &ScrapeResult, kind: &str) -> String {
    if let Some(classification) = result.final_classification() {
        return classification.describe().to_string();
    }

    let detail = result
        .last_attempt()
        .and_then(|a| a.error_message.as_deref());
    match (kind, detail) {
        (EXTRACTION_FAILED, Some(detail)) => format!("Failed to extract job fields: {}", detail),
        (EXTRACTION_FAILED, None) => "Failed to extract job fields".to_string(),
        (_, Some(detail)) => format!("Scrape failed: {}", detail),
        (_, None) => "Scrape failed".to_string(),
    }
}
