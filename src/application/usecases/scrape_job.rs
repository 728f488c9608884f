// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use url::Url;

use crate::application::dto::scrape_request::ScrapeRequestDto;
use crate::config::settings::Settings;
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::models::scrape_target::{ScrapeTarget, TargetError};
use crate::domain::services::field_extractor::SelectorExtractor;
use crate::domain::services::retry_orchestrator::{AttemptRunner, RetryOrchestrator};
use crate::engines::attempt_executor::{AttemptConfig, AttemptExecutor};
use crate::engines::rotation::{IdentityPool, ProxyPool};
use crate::engines::traits::SessionLauncher;
use crate::utils::retry_policy::RetryPolicy;

// === Section: Use Case Definition ===

/// 抓取单个职位的用例
///
/// 把调用方输入规范化为 [`ScrapeTarget`]，再交给重试编排器执行
pub struct ScrapeJobUseCase {
    orchestrator: RetryOrchestrator,
    site: Url,
    max_attempts: u32,
}

// === Section: Implementation ===

impl ScrapeJobUseCase {
    pub fn new(orchestrator: RetryOrchestrator, site: Url, max_attempts: u32) -> Self {
        Self {
            orchestrator,
            site,
            max_attempts,
        }
    }

    /// 按配置组装完整的抓取管线
    pub fn from_settings(
        settings: &Settings,
        launcher: Arc<dyn SessionLauncher>,
    ) -> anyhow::Result<Self> {
        let scraper = &settings.scraper;
        let site = scraper.site_url()?;

        let extractor = Arc::new(SelectorExtractor::new()?);
        let identities = Arc::new(IdentityPool::desktop());
        let proxies = Arc::new(ProxyPool::from_list(&scraper.proxies));

        let runner: Arc<dyn AttemptRunner> = Arc::new(AttemptExecutor::new(
            launcher,
            extractor,
            identities,
            proxies,
            AttemptConfig::from_settings(scraper),
        ));
        let orchestrator = RetryOrchestrator::new(runner, RetryPolicy::from_settings(scraper));

        Ok(Self::new(orchestrator, site, scraper.max_attempts))
    }

    /// 解析请求中的抓取目标
    ///
    /// `jobId` 可以是裸标识符或完整 URL，单独的 `url` 参数必须是 URL
    pub fn resolve_target(&self, request: &ScrapeRequestDto) -> Result<ScrapeTarget, TargetError> {
        let job_id = request.job_id.as_deref().map(str::trim).filter(|v| !v.is_empty());
        let url = request.url.as_deref().map(str::trim).filter(|v| !v.is_empty());

        match (job_id, url) {
            (Some(job_id), _) => ScrapeTarget::from_input(job_id, &self.site),
            (None, Some(url)) => ScrapeTarget::from_url(url, &self.site),
            (None, None) => Err(TargetError::Missing),
        }
    }

    pub async fn execute(&self, target: &ScrapeTarget) -> ScrapeResult {
        self.orchestrator
            .scrape_with_retry(target, self.max_attempts)
            .await
    }
}
