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

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use upscrape::application::usecases::scrape_job::ScrapeJobUseCase;
use upscrape::config::settings::Settings;
use upscrape::engines::chromium_engine::ChromiumLauncher;
use upscrape::engines::traits::SessionLauncher;
use upscrape::infrastructure::observability::metrics;
use upscrape::presentation::routes;
use upscrape::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting upscrape...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!(
        site = %settings.scraper.site_url,
        max_attempts = settings.scraper.max_attempts,
        headless = settings.browser.headless,
        "Configuration loaded"
    );

    // 3. Initialize Prometheus Metrics
    if settings.metrics.enabled {
        metrics::init_metrics(settings.metrics.port)?;
        info!(port = settings.metrics.port, "Prometheus exporter listening");
    }

    // 4. Build the scrape pipeline
    let launcher: Arc<dyn SessionLauncher> = Arc::new(ChromiumLauncher::new(&settings.browser));
    info!(engine = launcher.name(), "Browser launcher ready");
    let use_case = Arc::new(ScrapeJobUseCase::from_settings(&settings, launcher)?);

    // 5. Start HTTP server
    let app = routes::routes(use_case);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
