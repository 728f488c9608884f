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

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// 配置错误
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取与重试配置
    pub scraper: ScraperSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取配置设置
///
/// 所有时间单位均为毫秒
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// 目标站点根地址
    pub site_url: String,
    /// 单次请求的最大尝试次数
    pub max_attempts: u32,
    /// 导航超时
    pub navigation_timeout_ms: u64,
    /// 导航前随机延迟下限
    pub min_delay_ms: u64,
    /// 导航前随机延迟上限
    pub max_delay_ms: u64,
    /// 网络静默等待上限
    pub settle_timeout_ms: u64,
    /// 描述元素等待上限
    pub selector_timeout_ms: u64,
    /// 退避基准
    pub backoff_base_ms: u64,
    /// 退避上限
    pub backoff_max_ms: u64,
    /// 退避抖动比例 (0.0 - 1.0)
    pub backoff_jitter: f64,
    /// 逗号分隔的代理列表
    pub proxies: String,
}

impl ScraperSettings {
    pub fn site_url(&self) -> Result<Url, SettingsError> {
        let url = Url::parse(&self.site_url)
            .map_err(|e| SettingsError::invalid("scraper.site_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(SettingsError::invalid(
                "scraper.site_url",
                "must be an absolute http(s) URL",
            ));
        }
        Ok(url)
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头模式运行
    pub headless: bool,
    /// Chromium 可执行文件路径，未设置时自动探测
    pub executable: Option<String>,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出
    pub enabled: bool,
    /// 导出端口
    pub port: u16,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次合并默认值、`config/default`、`config/{APP_ENVIRONMENT}`、
    /// `UPSCRAPE__*` 环境变量，最后由 `PORT` 覆盖监听端口
    pub fn new() -> Result<Self, SettingsError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::base_builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("UPSCRAPE").separator("__"))
            .set_override_option("server.port", std::env::var("PORT").ok())?;

        Self::from_builder(builder)
    }

    /// 仅包含默认值的构建器
    pub fn base_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("scraper.site_url", "https://www.upwork.com")?
            .set_default("scraper.max_attempts", 3)?
            .set_default("scraper.navigation_timeout_ms", 45_000)?
            .set_default("scraper.min_delay_ms", 500)?
            .set_default("scraper.max_delay_ms", 2_500)?
            .set_default("scraper.settle_timeout_ms", 1_000)?
            .set_default("scraper.selector_timeout_ms", 12_000)?
            .set_default("scraper.backoff_base_ms", 2_000)?
            .set_default("scraper.backoff_max_ms", 30_000)?
            .set_default("scraper.backoff_jitter", 0.5)?
            .set_default("scraper.proxies", "")?
            .set_default("browser.headless", true)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.port", 9000)
    }

    /// 从构建器加载并校验
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<(), SettingsError> {
        let scraper = &self.scraper;

        if scraper.max_attempts == 0 {
            return Err(SettingsError::invalid(
                "scraper.max_attempts",
                "must be at least 1",
            ));
        }
        if scraper.navigation_timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "scraper.navigation_timeout_ms",
                "must be greater than zero",
            ));
        }
        if scraper.min_delay_ms > scraper.max_delay_ms {
            return Err(SettingsError::invalid(
                "scraper.min_delay_ms",
                format!(
                    "{} exceeds max_delay_ms {}",
                    scraper.min_delay_ms, scraper.max_delay_ms
                ),
            ));
        }
        if !(0.0..=1.0).contains(&scraper.backoff_jitter) {
            return Err(SettingsError::invalid(
                "scraper.backoff_jitter",
                "must be within 0.0 and 1.0",
            ));
        }
        scraper.site_url()?;

        Ok(())
    }
}
