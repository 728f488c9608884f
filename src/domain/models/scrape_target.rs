// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::utils::url_utils;

/// 输入规范化错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("Provide ?jobId=XXXX or ?url=https://www.upwork.com/jobs/~XXXX")]
    Missing,

    #[error("Job identifier `{0}` contains no alphanumeric characters")]
    EmptyIdentifier(String),

    #[error("Invalid job URL `{0}`")]
    InvalidUrl(String),

    #[error("URL `{0}` does not belong to the job site")]
    ForeignHost(String),
}

/// 抓取目标
///
/// 由调用方输入规范化得到，构造后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeTarget {
    raw_input: String,
    normalized_url: String,
    identifier: Option<String>,
}

impl ScrapeTarget {
    /// 根据调用方输入构造目标，自动区分裸标识符与完整 URL
    pub fn from_input(raw: &str, site: &Url) -> Result<Self, TargetError> {
        if url_utils::looks_like_url(raw) {
            Self::from_url(raw, site)
        } else {
            Self::from_identifier(raw, site)
        }
    }

    /// 从裸标识符构造目标
    ///
    /// 去掉所有非字母数字字符后拼出规范 URL `https://<site>/jobs/~<id>`。
    pub fn from_identifier(raw: &str, site: &Url) -> Result<Self, TargetError> {
        let identifier = url_utils::strip_identifier(raw);
        if identifier.is_empty() {
            return Err(TargetError::EmptyIdentifier(raw.to_string()));
        }

        Ok(Self {
            raw_input: raw.to_string(),
            normalized_url: url_utils::canonical_job_url(site, &identifier),
            identifier: Some(identifier),
        })
    }

    /// 从完整 URL 构造目标
    ///
    /// 格式正确且属于目标站点的 URL 原样保留，标识符尽力从路径中恢复。
    pub fn from_url(raw: &str, site: &Url) -> Result<Self, TargetError> {
        let trimmed = raw.trim();
        let parsed = Url::parse(trimmed).map_err(|_| TargetError::InvalidUrl(raw.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TargetError::InvalidUrl(raw.to_string()));
        }
        if !url_utils::is_same_site(&parsed, site) {
            return Err(TargetError::ForeignHost(raw.to_string()));
        }

        Ok(Self {
            raw_input: raw.to_string(),
            normalized_url: trimmed.to_string(),
            identifier: url_utils::extract_job_identifier(trimmed),
        })
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn normalized_url(&self) -> &str {
        &self.normalized_url
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}
