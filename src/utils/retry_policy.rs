// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use crate::config::settings::ScraperSettings;

/// 重试退避策略
///
/// 第 `attempt` 次失败后的等待时间从窗口 `[lower, upper]` 中随机选取，
/// 窗口下界随尝试次数线性增长，因此期望等待时间单调不减。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 初始退避时间
    pub initial_backoff: Duration,
    /// 最大退避时间
    pub max_backoff: Duration,
    /// 抖动因子 (0.0-1.0)，窗口上界 = 下界 * (1 + jitter_factor)
    pub jitter_factor: f64,
    /// 是否启用抖动
    pub enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(30),
            jitter_factor: 0.5,
            enable_jitter: true,
        }
    }
}

impl RetryPolicy {
    /// 不等待，直接重试
    pub fn immediate() -> Self {
        Self {
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            enable_jitter: false,
            ..Self::default()
        }
    }

    /// 根据抓取配置创建线性退避策略
    pub fn from_settings(settings: &ScraperSettings) -> Self {
        Self {
            initial_backoff: Duration::from_millis(settings.backoff_base_ms),
            max_backoff: Duration::from_millis(settings.backoff_max_ms),
            jitter_factor: settings.backoff_jitter,
            ..Self::default()
        }
    }

    /// 第 `attempt` 次失败后的退避窗口
    pub fn backoff_window(&self, attempt: u32) -> (Duration, Duration) {
        let attempt = attempt.max(1);
        let base_secs = self.initial_backoff.as_secs_f64();
        let max_secs = self.max_backoff.as_secs_f64();

        let lower = (base_secs * f64::from(attempt)).min(max_secs);

        let upper = if self.enable_jitter {
            (lower * (1.0 + self.jitter_factor.clamp(0.0, 1.0))).min(max_secs)
        } else {
            lower
        };

        (Duration::from_secs_f64(lower), Duration::from_secs_f64(upper))
    }

    /// 计算下次重试的退避时间
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let (lower, upper) = self.backoff_window(attempt);
        if upper <= lower {
            return lower;
        }
        Duration::from_secs_f64(rand::random_range(lower.as_secs_f64()..=upper.as_secs_f64()))
    }
}
