// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static JOB_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"~([A-Za-z0-9]+)").expect("job identifier pattern is valid"));

/// 输入是否看起来像完整 URL
pub fn looks_like_url(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

/// 去掉标识符中所有非字母数字字符
pub fn strip_identifier(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// 拼出职位页面的规范 URL
pub fn canonical_job_url(site: &Url, identifier: &str) -> String {
    format!("{}/jobs/~{}", site.origin().ascii_serialization(), identifier)
}

/// 从职位 URL 中恢复标识符
pub fn extract_job_identifier(url: &str) -> Option<String> {
    JOB_IDENTIFIER
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// URL 是否属于目标站点（站点主机或其注册域名下的任意子域名）
pub fn is_same_site(url: &Url, site: &Url) -> bool {
    let (Some(host), Some(site_host)) = (url.host_str(), site.host_str()) else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let site_host = site_host.to_ascii_lowercase();
    let domain = site_host.strip_prefix("www.").unwrap_or(&site_host);

    host == site_host || host == domain || host.ends_with(&format!(".{}", domain))
}
