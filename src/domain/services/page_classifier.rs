// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::classification::Classification;

/// 登录/账户安全页面路径
static LOGIN_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[a-z][a-z0-9+.-]*://[^/?#]*)?/(?:ab/)?(?:account-security|login)(?:[/?#]|$)")
        .expect("login path pattern is valid")
});

/// 自动化流量验证页的特征短语
const CHALLENGE_PHRASES: &[&str] = &[
    "verify you are a human",
    "unusual activity",
    "support id",
    "are you a robot",
    "checking your browser before accessing",
    "px-captcha",
    "cf-browser-verification",
    "just a moment...",
];

const ACCESS_DENIED_PHRASES: &[&str] = &[
    "access denied",
    "403 forbidden",
    "you don't have permission to access",
];

const RATE_LIMIT_PHRASES: &[&str] = &["too many requests", "rate limit exceeded"];

const SERVER_ERROR_PHRASES: &[&str] = &[
    "internal server error",
    "502 bad gateway",
    "503 service unavailable",
    "504 gateway time-out",
    "504 gateway timeout",
    "service temporarily unavailable",
];

/// 对最终渲染的页面进行分类
///
/// 按以下优先级依次匹配，命中即返回：
/// 1. 无内容 → `EmptyResponse`
/// 2. 最终地址为登录/账户安全路径 → `LoginRequired`
/// 3. 包含验证页短语 → `BotChallenge`
/// 4. 状态码 403 或拒绝访问短语 → `Forbidden`
/// 5. 状态码 429 或限流短语 → `RateLimited`
/// 6. 状态码 >= 500 或服务端错误短语 → `ServerError`
/// 7. 其余 → `Ok`
///
/// 纯函数，无副作用。
pub fn classify(markup: Option<&str>, resolved_url: &str, status_code: Option<u16>) -> Classification {
    let markup = match markup {
        Some(m) if !m.trim().is_empty() => m,
        _ => return Classification::EmptyResponse,
    };

    if LOGIN_PATH.is_match(resolved_url.trim()) {
        return Classification::LoginRequired;
    }

    let lowered = markup.to_lowercase();
    let contains_any = |phrases: &[&str]| phrases.iter().any(|p| lowered.contains(p));

    if contains_any(CHALLENGE_PHRASES) {
        return Classification::BotChallenge;
    }
    if status_code == Some(403) || contains_any(ACCESS_DENIED_PHRASES) {
        return Classification::Forbidden;
    }
    if status_code == Some(429) || contains_any(RATE_LIMIT_PHRASES) {
        return Classification::RateLimited;
    }
    if status_code.is_some_and(|s| s >= 500) || contains_any(SERVER_ERROR_PHRASES) {
        return Classification::ServerError;
    }

    Classification::Ok
}
