// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classification::Classification;
use super::job_record::JobRecord;

/// 单次尝试的结果类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// 页面可用且字段已提取
    Success,
    /// 页面已加载但内容不可用
    SoftFailure,
    /// 导航、传输或提取过程抛出错误
    HardFailure,
}

/// 单次抓取尝试的结果
///
/// 每次尝试生成一个实例，尝试结束后不再修改，
/// 在一次抓取请求的生命周期内由重试编排器独占持有。
#[derive(Debug, Clone, Serialize)]
pub struct AttemptOutcome {
    /// 尝试序号（从1开始）
    pub attempt_index: u32,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 耗时（毫秒）
    pub duration_ms: u64,
    /// 结果类别
    pub outcome: Outcome,
    /// 分类标签，未分类的失败为 `None`
    pub classification: Option<Classification>,
    /// 主文档 HTTP 状态码
    pub status_code: Option<u16>,
    /// 提取到的职位记录，仅成功时存在
    #[serde(skip)]
    pub extracted_record: Option<JobRecord>,
    /// 错误信息
    pub error_message: Option<String>,
    /// 本次使用的 User-Agent
    pub user_agent: Option<String>,
    /// 本次使用的视口（`WIDTHxHEIGHT`）
    pub viewport: Option<String>,
    /// 是否经过上游代理
    pub via_proxy: bool,
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// 未分类的失败（例如提取异常）不可重试
    pub fn is_retryable(&self) -> bool {
        !self.is_success() && self.classification.is_some_and(|c| c.is_retryable())
    }
}
