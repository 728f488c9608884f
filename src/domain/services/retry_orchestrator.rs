// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::models::attempt::AttemptOutcome;
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::models::scrape_target::ScrapeTarget;
use crate::utils::retry_policy::RetryPolicy;

/// 单次尝试执行者
///
/// 实现者必须把所有错误转换为 `AttemptOutcome` 返回，不能向调用方抛出。
#[async_trait]
pub trait AttemptRunner: Send + Sync {
    async fn run_attempt(&self, target: &ScrapeTarget, attempt_index: u32) -> AttemptOutcome;
}

/// 重试编排器
///
/// 严格串行地驱动 1..N 次尝试：成功立即返回，遇到不可重试的分类立即停止，
/// 否则在两次尝试之间按 [`RetryPolicy`] 退避。
pub struct RetryOrchestrator {
    runner: Arc<dyn AttemptRunner>,
    policy: RetryPolicy,
}

impl RetryOrchestrator {
    pub fn new(runner: Arc<dyn AttemptRunner>, policy: RetryPolicy) -> Self {
        Self { runner, policy }
    }

    /// 带重试的抓取
    ///
    /// `max_attempts` 为 0 时按 1 处理。
    pub async fn scrape_with_retry(&self, target: &ScrapeTarget, max_attempts: u32) -> ScrapeResult {
        let max_attempts = max_attempts.max(1);
        let mut attempts = Vec::with_capacity(max_attempts as usize);

        for attempt in 1..=max_attempts {
            let outcome = self.runner.run_attempt(target, attempt).await;

            if outcome.is_success() {
                if let Some(record) = outcome.extracted_record.clone() {
                    info!(
                        job_url = %target.normalized_url(),
                        attempt,
                        "Scrape succeeded"
                    );
                    attempts.push(outcome);
                    return ScrapeResult::succeeded(record, attempts);
                }
            }

            let retryable = outcome.is_retryable();
            let classification = outcome.classification;
            attempts.push(outcome);

            if !retryable {
                warn!(
                    job_url = %target.normalized_url(),
                    attempt,
                    classification = ?classification,
                    "Non-retryable failure, giving up"
                );
                break;
            }

            if attempt == max_attempts {
                warn!(
                    job_url = %target.normalized_url(),
                    attempts = max_attempts,
                    classification = ?classification,
                    "Attempts exhausted"
                );
                break;
            }

            let backoff = self.policy.calculate_backoff(attempt);
            debug!(
                job_url = %target.normalized_url(),
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                "Backing off before next attempt"
            );
            tokio::time::sleep(backoff).await;
        }

        ScrapeResult::failed(attempts)
    }
}
