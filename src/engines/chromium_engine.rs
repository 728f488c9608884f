// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::http::HttpRequest;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{BrowserSession, SessionError, SessionLauncher, SessionOptions};

// Hides the most common automation fingerprints before any page script runs.
const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });
window.chrome = window.chrome || { runtime: {} };
"#;

const RESOURCE_COUNT_JS: &str = "performance.getEntriesByType('resource').length";

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const QUIET_WINDOW: Duration = Duration::from_millis(500);

fn protocol(error: CdpError) -> SessionError {
    match error {
        CdpError::Timeout => SessionError::Timeout,
        other => SessionError::Protocol(other.to_string()),
    }
}

/// Chromium 会话启动器
///
/// 基于 chromiumoxide，每次尝试启动一个独立的浏览器进程和临时用户目录，
/// 避免 Cookie 与指纹在尝试之间残留。
pub struct ChromiumLauncher {
    headless: bool,
    executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    pub fn new(settings: &BrowserSettings) -> Self {
        Self {
            headless: settings.headless,
            executable: settings.executable.as_ref().map(PathBuf::from),
        }
    }
}

/// 启动参数
pub fn browser_args(options: &SessionOptions) -> Vec<String> {
    let mut args = vec![
        "--disable-setuid-sandbox".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        format!("--user-agent={}", options.identity.user_agent),
    ];
    if let Some(proxy) = &options.proxy {
        args.push(format!("--proxy-server={}", proxy));
    }
    args
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self, options: &SessionOptions) -> Result<Box<dyn BrowserSession>, SessionError> {
        let profile = tempfile::Builder::new()
            .prefix("upscrape-")
            .tempdir()
            .map_err(|e| SessionError::Launch(format!("user data dir: {}", e)))?;
        let viewport = options.identity.viewport;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(options.navigation_timeout)
            .window_size(viewport.width, viewport.height)
            .viewport(None)
            .user_data_dir(profile.path());

        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.executable {
            builder = builder.chrome_executable(executable);
        }
        for arg in browser_args(options) {
            builder = builder.arg(arg);
        }

        let config = builder.build().map_err(SessionError::Launch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // From here on a dropped launch future still releases the task and the profile.
        let mut session = ChromiumSession {
            browser,
            page: None,
            guard: SessionGuard::new(handler_task, profile),
        };

        if let Err(e) = session.prepare().await {
            session.close().await;
            return Err(e);
        }

        Ok(Box::new(session))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// 会话附属资源：事件处理任务与临时用户目录
///
/// 显式 `release` 或析构时释放，保证未走到 `close` 的半启动会话也不会遗留。
struct SessionGuard {
    handler_task: JoinHandle<()>,
    profile: Option<TempDir>,
}

impl SessionGuard {
    fn new(handler_task: JoinHandle<()>, profile: TempDir) -> Self {
        Self {
            handler_task,
            profile: Some(profile),
        }
    }

    fn release(&mut self) {
        self.handler_task.abort();
        if let Some(profile) = self.profile.take() {
            let dir = profile.path().to_path_buf();
            if let Err(e) = profile.close() {
                debug!(error = %e, dir = %dir.display(), "Failed to remove user data dir");
            }
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// 主文档请求的 HTTP 状态码
fn navigation_status(request: Option<&HttpRequest>) -> Option<u16> {
    request
        .and_then(|req| req.response.as_ref())
        .and_then(|resp| u16::try_from(resp.status).ok())
        .filter(|s| *s != 0)
}

/// 单次尝试独占的 Chromium 会话
// Field order matters: the browser drops (and is killed) before the guard removes its profile.
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    guard: SessionGuard,
}

impl ChromiumSession {
    /// 打开空白页并注入脚本
    async fn prepare(&mut self) -> Result<(), SessionError> {
        let page = self.browser.new_page("about:blank").await.map_err(protocol)?;

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_SCRIPT))
            .await
            .map_err(protocol)?;

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page, SessionError> {
        self.page
            .as_ref()
            .ok_or_else(|| SessionError::Protocol("page is not open".to_string()))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<Option<u16>, SessionError> {
        let page = self.page()?;

        page.goto(url).await.map_err(|e| match e {
            CdpError::Timeout => SessionError::Timeout,
            other => SessionError::Navigation(other.to_string()),
        })?;

        // The main frame's own request, resolved once the frame has loaded.
        let request = page.wait_for_navigation_response().await.map_err(protocol)?;
        Ok(navigation_status(request.as_deref()))
    }

    async fn wait_for_network_idle(&mut self, timeout: Duration) -> Result<(), SessionError> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;
        let mut last_count: Option<u64> = None;
        let mut stable_since = Instant::now();

        while Instant::now() < deadline {
            let count: u64 = page
                .evaluate(RESOURCE_COUNT_JS)
                .await
                .map_err(protocol)?
                .into_value()
                .map_err(|e| SessionError::Protocol(e.to_string()))?;

            if last_count == Some(count) {
                if stable_since.elapsed() >= QUIET_WINDOW {
                    return Ok(());
                }
            } else {
                last_count = Some(count);
                stable_since = Instant::now();
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        Err(SessionError::Timeout)
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<(), SessionError> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;

        while Instant::now() < deadline {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        Err(SessionError::Timeout)
    }

    async fn content(&mut self) -> Result<String, SessionError> {
        self.page()?.content().await.map_err(protocol)
    }

    async fn current_url(&mut self) -> Result<String, SessionError> {
        Ok(self.page()?.url().await.map_err(protocol)?.unwrap_or_default())
    }

    async fn close(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!(error = %e, "Failed to close page");
            }
        }
        if let Err(e) = self.browser.close().await {
            debug!(error = %e, "Failed to close browser");
        }
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "Failed to wait for browser exit");
        }
        self.guard.release();
    }
}
