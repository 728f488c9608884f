// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

use super::attempt::{AttemptOutcome, Outcome};
use super::classification::Classification;
use super::job_record::JobRecord;

/// 提取阶段抛出错误时的最终错误类型
pub const EXTRACTION_FAILED: &str = "extraction_failed";
/// 没有任何分类信息时的通用错误类型
pub const SCRAPE_FAILED: &str = "scrape_failed";

/// 抓取结果
///
/// 返回给请求处理器的终态对象，返回后不再修改。
/// `attempts` 的长度介于 1 与配置的最大尝试次数之间。
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResult {
    /// 是否成功
    pub success: bool,
    /// 成功时的职位记录
    pub record: Option<JobRecord>,
    /// 失败时的最终错误类型
    pub final_error_kind: Option<String>,
    /// 按顺序排列的全部尝试
    pub attempts: Vec<AttemptOutcome>,
}

impl ScrapeResult {
    /// 以成功结束
    pub fn succeeded(record: JobRecord, attempts: Vec<AttemptOutcome>) -> Self {
        Self {
            success: true,
            record: Some(record),
            final_error_kind: None,
            attempts,
        }
    }

    /// 以失败结束，最终错误类型取自最后一次尝试
    pub fn failed(attempts: Vec<AttemptOutcome>) -> Self {
        let final_error_kind = match attempts.last() {
            Some(last) => match (last.classification, last.outcome) {
                // A success without a record carries no usable error kind.
                (_, Outcome::Success) => SCRAPE_FAILED,
                (Some(classification), _) => classification.as_str(),
                (None, Outcome::HardFailure) => EXTRACTION_FAILED,
                (None, _) => SCRAPE_FAILED,
            },
            None => SCRAPE_FAILED,
        };

        Self {
            success: false,
            record: None,
            final_error_kind: Some(final_error_kind.to_string()),
            attempts,
        }
    }

    pub fn last_attempt(&self) -> Option<&AttemptOutcome> {
        self.attempts.last()
    }

    /// 最后一次尝试的分类
    pub fn final_classification(&self) -> Option<Classification> {
        self.last_attempt().and_then(|a| a.classification)
    }
}
