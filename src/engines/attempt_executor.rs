// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::settings::ScraperSettings;
use crate::domain::models::attempt::{AttemptOutcome, Outcome};
use crate::domain::models::classification::Classification;
use crate::domain::models::job_record::JobRecord;
use crate::domain::models::scrape_target::ScrapeTarget;
use crate::domain::services::field_extractor::{FieldExtractor, DESCRIPTION_READY_SELECTOR};
use crate::domain::services::page_classifier;
use crate::domain::services::retry_orchestrator::AttemptRunner;
use crate::engines::rotation::{IdentityPool, ProxyPool};
use crate::engines::traits::{
    BrowserSession, ClientIdentity, SessionError, SessionLauncher, SessionOptions, Viewport,
};
use crate::infrastructure::observability::metrics;

/// 单次尝试的时间参数
#[derive(Debug, Clone)]
pub struct AttemptConfig {
    /// 导航硬超时，同样用于启动与内容读取
    pub navigation_timeout: Duration,
    /// 导航前随机等待的下界
    pub min_delay: Duration,
    /// 导航前随机等待的上界
    pub max_delay: Duration,
    /// 网络静默等待上限
    pub settle_timeout: Duration,
    /// 职位描述元素等待上限
    pub selector_timeout: Duration,
    /// 用于判断页面就绪的元素
    pub ready_selector: String,
}

impl AttemptConfig {
    pub fn from_settings(settings: &ScraperSettings) -> Self {
        Self {
            navigation_timeout: Duration::from_millis(settings.navigation_timeout_ms),
            min_delay: Duration::from_millis(settings.min_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            settle_timeout: Duration::from_millis(settings.settle_timeout_ms),
            selector_timeout: Duration::from_millis(settings.selector_timeout_ms),
            ready_selector: DESCRIPTION_READY_SELECTOR.to_string(),
        }
    }

    /// 在 `[min_delay, max_delay]` 内随机选取导航前等待时间
    pub fn pick_delay(&self) -> Duration {
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        if max <= min {
            return self.min_delay;
        }
        Duration::from_millis(rand::random_range(min..=max))
    }
}

/// 会话内的失败，最终被折叠为 `HardFailure`
struct AttemptFailure {
    classification: Option<Classification>,
    status_code: Option<u16>,
    message: String,
}

impl AttemptFailure {
    fn timed_out(stage: &str) -> Self {
        Self {
            classification: Some(Classification::Timeout),
            status_code: None,
            message: format!("{} exceeded the navigation deadline", stage),
        }
    }

    fn session(error: SessionError) -> Self {
        let classification = if error.is_timeout() {
            Classification::Timeout
        } else {
            Classification::TransportFailure
        };
        Self {
            classification: Some(classification),
            status_code: None,
            message: error.to_string(),
        }
    }
}

/// 页面加载完成后的判定
enum PageVerdict {
    Extracted {
        status_code: Option<u16>,
        record: JobRecord,
    },
    Rejected {
        status_code: Option<u16>,
        classification: Classification,
    },
}

/// 尝试执行器
///
/// 负责一次浏览器会话的完整生命周期：启动、导航、等待就绪、分类、
/// 提取或报告失败、释放。任何错误都被折叠进 `AttemptOutcome`，不会向上抛出；
/// 会话一旦启动成功，无论从哪条路径退出都会恰好关闭一次。
pub struct AttemptExecutor {
    launcher: Arc<dyn SessionLauncher>,
    extractor: Arc<dyn FieldExtractor>,
    identities: Arc<IdentityPool>,
    proxies: Arc<ProxyPool>,
    config: AttemptConfig,
}

impl AttemptExecutor {
    pub fn new(
        launcher: Arc<dyn SessionLauncher>,
        extractor: Arc<dyn FieldExtractor>,
        identities: Arc<IdentityPool>,
        proxies: Arc<ProxyPool>,
        config: AttemptConfig,
    ) -> Self {
        Self {
            launcher,
            extractor,
            identities,
            proxies,
            config,
        }
    }

    /// 执行一次尝试
    pub async fn execute_attempt(&self, target: &ScrapeTarget, attempt_index: u32) -> AttemptOutcome {
        let started_at = Utc::now();
        let start = Instant::now();

        let identity = self.identities.pick().unwrap_or_else(|| ClientIdentity {
            user_agent: String::new(),
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
        });
        let proxy = self.proxies.pick();
        let via_proxy = proxy.is_some();
        let options = SessionOptions {
            identity: identity.clone(),
            proxy,
            navigation_timeout: self.config.navigation_timeout,
        };

        debug!(
            attempt = attempt_index,
            launcher = self.launcher.name(),
            viewport = %identity.viewport,
            via_proxy,
            "Launching browser session"
        );

        let result = match self
            .bounded("Browser launch", self.launcher.launch(&options))
            .await
        {
            Ok(mut session) => {
                let driven = AssertUnwindSafe(self.drive(session.as_mut(), target))
                    .catch_unwind()
                    .await;
                session.close().await;
                match driven {
                    Ok(result) => result,
                    // The session is released before the panic continues.
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            Err(failure) => Err(failure),
        };

        let (outcome, classification, status_code, record, error_message) = match result {
            Ok(PageVerdict::Extracted {
                status_code,
                record,
            }) => (
                Outcome::Success,
                Some(Classification::Ok),
                status_code,
                Some(record),
                None,
            ),
            Ok(PageVerdict::Rejected {
                status_code,
                classification,
            }) => (
                Outcome::SoftFailure,
                Some(classification),
                status_code,
                None,
                Some(classification.describe().to_string()),
            ),
            Err(failure) => (
                Outcome::HardFailure,
                failure.classification,
                failure.status_code,
                None,
                Some(failure.message),
            ),
        };

        let elapsed = start.elapsed();
        let label = classification.map_or("extraction_failed", |c| c.as_str());
        metrics::record_attempt(label, elapsed);

        match outcome {
            Outcome::Success => info!(
                attempt = attempt_index,
                classification = label,
                status_code = ?status_code,
                duration_ms = elapsed.as_millis() as u64,
                job_url = %target.normalized_url(),
                "Attempt succeeded"
            ),
            _ => warn!(
                attempt = attempt_index,
                classification = label,
                status_code = ?status_code,
                duration_ms = elapsed.as_millis() as u64,
                job_url = %target.normalized_url(),
                error = error_message.as_deref().unwrap_or_default(),
                "Attempt failed"
            ),
        }

        AttemptOutcome {
            attempt_index,
            started_at,
            duration_ms: elapsed.as_millis() as u64,
            outcome,
            classification,
            status_code,
            extracted_record: record,
            error_message,
            user_agent: Some(identity.user_agent),
            viewport: Some(identity.viewport.to_string()),
            via_proxy,
        }
    }

    /// 导航、等待、分类与提取
    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        target: &ScrapeTarget,
    ) -> Result<PageVerdict, AttemptFailure> {
        let delay = self.config.pick_delay();
        debug!(delay_ms = delay.as_millis() as u64, "Pre-navigation delay");
        tokio::time::sleep(delay).await;

        let status_code = self
            .bounded("Navigation", session.navigate(target.normalized_url()))
            .await?;

        let settle = self.config.settle_timeout;
        if !matches!(
            tokio::time::timeout(settle, session.wait_for_network_idle(settle)).await,
            Ok(Ok(()))
        ) {
            debug!("Network did not settle in time, continuing");
        }

        let selector_timeout = self.config.selector_timeout;
        if !matches!(
            tokio::time::timeout(
                selector_timeout,
                session.wait_for_selector(&self.config.ready_selector, selector_timeout),
            )
            .await,
            Ok(Ok(()))
        ) {
            debug!("Description not found in time, continuing anyway");
        }

        let markup = self.bounded("Content capture", session.content()).await?;
        let resolved_url = match session.current_url().await {
            Ok(url) if !url.is_empty() => url,
            _ => target.normalized_url().to_string(),
        };

        let classification = page_classifier::classify(Some(&markup), &resolved_url, status_code);
        if classification != Classification::Ok {
            return Ok(PageVerdict::Rejected {
                status_code,
                classification,
            });
        }

        match self.extractor.extract(&markup) {
            Ok(record) => Ok(PageVerdict::Extracted {
                status_code,
                record,
            }),
            Err(e) => Err(AttemptFailure {
                classification: None,
                status_code,
                message: format!("Field extraction failed: {}", e),
            }),
        }
    }

    /// 在导航超时内等待会话操作完成
    async fn bounded<T, F>(&self, stage: &str, operation: F) -> Result<T, AttemptFailure>
    where
        F: Future<Output = Result<T, SessionError>>,
    {
        match tokio::time::timeout(self.config.navigation_timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AttemptFailure::session(e)),
            Err(_) => Err(AttemptFailure::timed_out(stage)),
        }
    }
}

#[async_trait]
impl AttemptRunner for AttemptExecutor {
    async fn run_attempt(&self, target: &ScrapeTarget, attempt_index: u32) -> AttemptOutcome {
        self.execute_attempt(target, attempt_index).await
    }
}
