// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 重试编排器测试模块
///
/// 使用脚本化的尝试执行者验证尝试次数上限、提前终止与退避

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use upscrape::domain::models::attempt::{AttemptOutcome, Outcome};
    use upscrape::domain::models::classification::Classification;
    use upscrape::domain::models::job_record::JobRecord;
    use upscrape::domain::models::scrape_target::ScrapeTarget;
    use upscrape::domain::services::retry_orchestrator::{AttemptRunner, RetryOrchestrator};
    use upscrape::utils::retry_policy::RetryPolicy;

    use crate::helpers::target;

    /// 脚本中的一步
    #[derive(Clone)]
    enum Step {
        Page(Classification),
        ExtractionError,
        SuccessWithoutRecord,
    }

    /// 按脚本返回结果的尝试执行者，脚本用完后重复最后一步
    struct ScriptedRunner {
        steps: Vec<Step>,
        calls: AtomicU32,
    }

    impl ScriptedRunner {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn record_for(attempt_index: u32) -> JobRecord {
        JobRecord {
            job_title: Some(format!("title from attempt {}", attempt_index)),
            ..JobRecord::default()
        }
    }

    #[async_trait]
    impl AttemptRunner for ScriptedRunner {
        async fn run_attempt(&self, _target: &ScrapeTarget, attempt_index: u32) -> AttemptOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let position = (attempt_index as usize - 1).min(self.steps.len() - 1);

            let (outcome, classification, record) = match &self.steps[position] {
                Step::Page(Classification::Ok) => (
                    Outcome::Success,
                    Some(Classification::Ok),
                    Some(record_for(attempt_index)),
                ),
                Step::Page(c) => (Outcome::SoftFailure, Some(*c), None),
                Step::ExtractionError => (Outcome::HardFailure, None, None),
                Step::SuccessWithoutRecord => (Outcome::Success, Some(Classification::Ok), None),
            };

            AttemptOutcome {
                attempt_index,
                started_at: Utc::now(),
                duration_ms: 10,
                outcome,
                classification,
                status_code: Some(200),
                extracted_record: record,
                error_message: None,
                user_agent: None,
                viewport: None,
                via_proxy: false,
            }
        }
    }

    fn orchestrator(runner: Arc<ScriptedRunner>, policy: RetryPolicy) -> RetryOrchestrator {
        RetryOrchestrator::new(runner, policy)
    }

    #[tokio::test]
    async fn test_never_exceeds_max_attempts() {
        for max_attempts in 1..=5 {
            let runner = ScriptedRunner::new(vec![Step::Page(Classification::RateLimited)]);
            let result = orchestrator(runner.clone(), RetryPolicy::immediate())
                .scrape_with_retry(&target("0123abc"), max_attempts)
                .await;

            assert!(!result.success);
            assert_eq!(result.attempts.len() as u32, max_attempts);
            assert_eq!(runner.calls(), max_attempts);
            assert_eq!(result.final_error_kind.as_deref(), Some("rate_limited"));
        }
    }

    #[tokio::test]
    async fn test_attempt_indices_are_sequential() {
        let runner = ScriptedRunner::new(vec![Step::Page(Classification::Timeout)]);
        let result = orchestrator(runner, RetryPolicy::immediate())
            .scrape_with_retry(&target("0123abc"), 4)
            .await;

        let indices: Vec<u32> = result.attempts.iter().map(|a| a.attempt_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_login_required_stops_immediately() {
        let runner = ScriptedRunner::new(vec![
            Step::Page(Classification::ServerError),
            Step::Page(Classification::LoginRequired),
            Step::Page(Classification::Ok),
        ]);
        let result = orchestrator(runner.clone(), RetryPolicy::immediate())
            .scrape_with_retry(&target("0123abc"), 5)
            .await;

        assert!(!result.success);
        assert_eq!(result.attempts.len(), 2);
        assert_eq!(runner.calls(), 2);
        assert_eq!(result.final_error_kind.as_deref(), Some("login_required"));
        assert_eq!(result.final_classification(), Some(Classification::LoginRequired));
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_classification() {
        let runner = ScriptedRunner::new(vec![
            Step::Page(Classification::BotChallenge),
            Step::Page(Classification::EmptyResponse),
            Step::Page(Classification::ServerError),
        ]);
        let result = orchestrator(runner, RetryPolicy::immediate())
            .scrape_with_retry(&target("0123abc"), 3)
            .await;

        assert_eq!(result.attempts.len(), 3);
        assert_eq!(result.final_error_kind.as_deref(), Some("server_error"));
    }

    #[tokio::test]
    async fn test_success_on_second_attempt_returns_that_record() {
        let runner = ScriptedRunner::new(vec![
            Step::Page(Classification::Timeout),
            Step::Page(Classification::Ok),
        ]);
        let result = orchestrator(runner.clone(), RetryPolicy::immediate())
            .scrape_with_retry(&target("0123abc"), 3)
            .await;

        assert!(result.success);
        assert_eq!(result.attempts.len(), 2);
        assert_eq!(runner.calls(), 2);
        assert!(result.final_error_kind.is_none());
        assert_eq!(
            result.record.as_ref().unwrap().job_title.as_deref(),
            Some("title from attempt 2")
        );
        assert_eq!(result.attempts[0].outcome, Outcome::SoftFailure);
        assert_eq!(result.attempts[1].outcome, Outcome::Success);
    }

    #[tokio::test]
    async fn test_extraction_error_is_terminal() {
        let runner = ScriptedRunner::new(vec![Step::ExtractionError, Step::Page(Classification::Ok)]);
        let result = orchestrator(runner.clone(), RetryPolicy::immediate())
            .scrape_with_retry(&target("0123abc"), 3)
            .await;

        assert!(!result.success);
        assert_eq!(runner.calls(), 1);
        assert_eq!(result.final_error_kind.as_deref(), Some("extraction_failed"));
    }

    #[tokio::test]
    async fn test_success_without_record_is_generic_failure() {
        let runner = ScriptedRunner::new(vec![Step::SuccessWithoutRecord]);
        let result = orchestrator(runner.clone(), RetryPolicy::immediate())
            .scrape_with_retry(&target("0123abc"), 3)
            .await;

        assert!(!result.success);
        assert!(result.record.is_none());
        assert_eq!(runner.calls(), 1);
        assert_eq!(result.final_error_kind.as_deref(), Some("scrape_failed"));
    }

    #[tokio::test]
    async fn test_zero_max_attempts_runs_once() {
        let runner = ScriptedRunner::new(vec![Step::Page(Classification::ServerError)]);
        let result = orchestrator(runner.clone(), RetryPolicy::immediate())
            .scrape_with_retry(&target("0123abc"), 0)
            .await;

        assert_eq!(result.attempts.len(), 1);
        assert_eq!(runner.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_grows_linearly_between_attempts() {
        let runner = ScriptedRunner::new(vec![Step::Page(Classification::ServerError)]);
        let started = tokio::time::Instant::now();

        let result = orchestrator(runner, RetryPolicy::default())
            .scrape_with_retry(&target("0123abc"), 3)
            .await;

        // 第1次之后 [2s, 3s]，第2次之后 [4s, 6s]，最后一次之后不再等待
        let waited = started.elapsed();
        assert_eq!(result.attempts.len(), 3);
        assert!(waited >= Duration::from_secs(6), "waited {:?}", waited);
        assert!(waited <= Duration::from_secs(9), "waited {:?}", waited);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_backoff_after_terminal_failure() {
        let runner = ScriptedRunner::new(vec![Step::Page(Classification::LoginRequired)]);
        let started = tokio::time::Instant::now();

        orchestrator(runner, RetryPolicy::default())
            .scrape_with_retry(&target("0123abc"), 3)
            .await;

        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
