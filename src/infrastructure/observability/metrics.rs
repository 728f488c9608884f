// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// 初始化指标系统
///
/// 在给定端口启动 Prometheus 导出并注册抓取相关指标
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(SocketAddr::from(([0, 0, 0, 0], port)))
        .install()?;

    describe_counter!(
        "scrape_requests_total",
        "Total number of scrape requests by final outcome"
    );
    describe_counter!(
        "scrape_attempts_total",
        "Total number of browser attempts by classification"
    );
    describe_histogram!(
        "scrape_attempt_duration_seconds",
        "Duration of a single browser attempt in seconds"
    );

    Ok(())
}

/// 记录一次浏览器尝试
pub fn record_attempt(classification: &'static str, elapsed: Duration) {
    counter!("scrape_attempts_total", "classification" => classification).increment(1);
    histogram!("scrape_attempt_duration_seconds").record(elapsed.as_secs_f64());
}

/// 记录一次请求的最终结果
pub fn record_request(outcome: &'static str) {
    counter!("scrape_requests_total", "outcome" => outcome).increment(1);
}
