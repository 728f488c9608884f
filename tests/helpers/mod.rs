// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use upscrape::application::usecases::scrape_job::ScrapeJobUseCase;
use upscrape::config::settings::Settings;
use upscrape::domain::models::scrape_target::ScrapeTarget;
use upscrape::engines::traits::{BrowserSession, SessionError, SessionLauncher, SessionOptions};

pub const SITE: &str = "https://www.upwork.com";

/// 渲染完成的职位页面
pub const JOB_PAGE: &str = r#"<html><body>
<div data-test="breadcrumb"><a href="/">Jobs</a><a href="/cat">Web Development</a><a href="/sub">Back-End Development</a></div>
<h1 data-test="job-header-title">  Senior Rust Engineer  </h1>
<section data-test="job-description"><p>Build a <b>reliable</b> scraper.</p></section>
<span data-test="experience-level">Expert</span>
<span data-test="project-length">1 to 3 months</span>
<span data-test="budget-fixed">$1,500</span>
<span data-test="client-location">Germany</span>
<span data-test="client-feedback">4.9</span>
<span data-test="client-spend">$20K+ spent</span>
<span data-test="client-hires">12 hires</span>
<span data-test="payment-verification-status">Payment verified</span>
<span data-test="client-rating">   </span>
</body></html>"#;

/// 自动化流量验证页
pub const CHALLENGE_PAGE: &str =
    "<html><body><h1>Please verify you are a human</h1><div id='px-captcha'></div></body></html>";

pub const LOGIN_URL: &str = "https://www.upwork.com/ab/account-security/login?redir=%2Fjobs";

/// 导航后网络静默与元素等待的表现
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waits {
    /// 立即就绪
    Ready,
    /// 立即报错
    Fail,
    /// 永不返回
    Hang,
}

/// 单次会话的脚本化行为
#[derive(Debug, Clone)]
pub enum PageScript {
    /// 正常加载出页面
    Page {
        status: Option<u16>,
        markup: String,
        final_url: Option<String>,
        waits: Waits,
    },
    /// 启动失败
    LaunchError,
    /// 导航抛出错误
    NavigationError,
    /// 导航永不返回
    Hang,
    /// 读取内容失败
    ContentError,
    /// 导航过程中崩溃
    Panic,
}

impl PageScript {
    pub fn job_page() -> Self {
        Self::page(200, JOB_PAGE)
    }

    pub fn page(status: u16, markup: &str) -> Self {
        Self::Page {
            status: Some(status),
            markup: markup.to_string(),
            final_url: None,
            waits: Waits::Ready,
        }
    }

    /// 职位页面可以取到，但就绪等待按 `waits` 表现
    pub fn job_page_with(waits: Waits) -> Self {
        Self::Page {
            status: Some(200),
            markup: JOB_PAGE.to_string(),
            final_url: None,
            waits,
        }
    }

    pub fn redirect(final_url: &str, markup: &str) -> Self {
        Self::Page {
            status: Some(200),
            markup: markup.to_string(),
            final_url: Some(final_url.to_string()),
            waits: Waits::Ready,
        }
    }
}

/// 按脚本依次返回会话的启动器，统计启动与关闭次数
pub struct FakeLauncher {
    scripts: Mutex<VecDeque<PageScript>>,
    fallback: PageScript,
    launches: AtomicUsize,
    closes: Arc<AtomicUsize>,
    options: Mutex<Vec<SessionOptions>>,
}

impl FakeLauncher {
    /// 先按顺序消费 `scripts`，用完后一直返回 `fallback`
    pub fn new(scripts: Vec<PageScript>, fallback: PageScript) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            fallback,
            launches: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
            options: Mutex::new(Vec::new()),
        })
    }

    pub fn always(script: PageScript) -> Arc<Self> {
        Self::new(Vec::new(), script)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn options(&self) -> Vec<SessionOptions> {
        self.options.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self, options: &SessionOptions) -> Result<Box<dyn BrowserSession>, SessionError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        self.options.lock().unwrap().push(options.clone());

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        if let PageScript::LaunchError = script {
            return Err(SessionError::Launch("chromium binary not found".to_string()));
        }

        Ok(Box::new(FakeSession {
            script,
            closes: Arc::clone(&self.closes),
            navigated: None,
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub struct FakeSession {
    script: PageScript,
    closes: Arc<AtomicUsize>,
    navigated: Option<String>,
}

impl FakeSession {
    async fn scripted_wait(&self) -> Result<(), SessionError> {
        match &self.script {
            PageScript::Page {
                waits: Waits::Fail, ..
            } => Err(SessionError::Protocol("execution context was destroyed".to_string())),
            PageScript::Page {
                waits: Waits::Hang, ..
            } => std::future::pending::<Result<(), SessionError>>().await,
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<Option<u16>, SessionError> {
        self.navigated = Some(url.to_string());
        match &self.script {
            PageScript::Page { status, .. } => Ok(*status),
            PageScript::NavigationError => {
                Err(SessionError::Navigation("net::ERR_CONNECTION_RESET".to_string()))
            }
            PageScript::Hang => std::future::pending::<Result<Option<u16>, SessionError>>().await,
            PageScript::Panic => panic!("browser crashed"),
            PageScript::ContentError | PageScript::LaunchError => Ok(Some(200)),
        }
    }

    async fn wait_for_network_idle(&mut self, _timeout: Duration) -> Result<(), SessionError> {
        self.scripted_wait().await
    }

    async fn wait_for_selector(&mut self, _selector: &str, _timeout: Duration) -> Result<(), SessionError> {
        self.scripted_wait().await
    }

    async fn content(&mut self) -> Result<String, SessionError> {
        match &self.script {
            PageScript::Page { markup, .. } => Ok(markup.clone()),
            _ => Err(SessionError::Protocol("target closed".to_string())),
        }
    }

    async fn current_url(&mut self) -> Result<String, SessionError> {
        match &self.script {
            PageScript::Page {
                final_url: Some(url),
                ..
            } => Ok(url.clone()),
            _ => Ok(self.navigated.clone().unwrap_or_default()),
        }
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn site() -> Url {
    Url::parse(SITE).unwrap()
}

pub fn target(identifier: &str) -> ScrapeTarget {
    ScrapeTarget::from_identifier(identifier, &site()).unwrap()
}

/// 没有随机等待与退避的配置
pub fn test_settings(max_attempts: u32) -> Settings {
    let builder = Settings::base_builder()
        .unwrap()
        .set_override("scraper.max_attempts", i64::from(max_attempts))
        .unwrap()
        .set_override("scraper.min_delay_ms", 0)
        .unwrap()
        .set_override("scraper.max_delay_ms", 0)
        .unwrap()
        .set_override("scraper.backoff_base_ms", 0)
        .unwrap()
        .set_override("scraper.backoff_max_ms", 0)
        .unwrap();
    Settings::from_builder(builder).unwrap()
}

pub fn test_use_case(launcher: Arc<FakeLauncher>, max_attempts: u32) -> Arc<ScrapeJobUseCase> {
    let launcher: Arc<dyn SessionLauncher> = launcher;
    Arc::new(ScrapeJobUseCase::from_settings(&test_settings(max_attempts), launcher).unwrap())
}
