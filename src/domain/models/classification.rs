// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 页面分类标签
///
/// 每次抓取尝试恰好对应一个标签，只有 `Ok` 允许进入字段提取阶段。
/// `Timeout` 与 `TransportFailure` 仅由尝试执行器在导航或传输异常时产生，
/// 页面分类器本身不会返回这两个标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// 页面内容可用
    Ok,
    /// 页面没有任何内容
    EmptyResponse,
    /// 被重定向到登录或账户安全页面
    LoginRequired,
    /// 自动化流量验证页
    BotChallenge,
    /// 访问被拒绝
    Forbidden,
    /// 触发限流
    RateLimited,
    /// 目标站点服务端错误
    ServerError,
    /// 超过导航截止时间
    Timeout,
    /// 浏览器或网络传输失败
    TransportFailure,
}

impl Classification {
    /// 序列化时使用的标签字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Ok => "ok",
            Classification::EmptyResponse => "empty_response",
            Classification::LoginRequired => "login_required",
            Classification::BotChallenge => "bot_challenge",
            Classification::Forbidden => "forbidden",
            Classification::RateLimited => "rate_limited",
            Classification::ServerError => "server_error",
            Classification::Timeout => "timeout",
            Classification::TransportFailure => "transport_failure",
        }
    }

    /// 判断该分类是否值得再次尝试
    ///
    /// `LoginRequired` 是持久状态，重试窗口内不会改变，因此不可重试。
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Classification::Timeout
                | Classification::EmptyResponse
                | Classification::BotChallenge
                | Classification::Forbidden
                | Classification::RateLimited
                | Classification::ServerError
                | Classification::TransportFailure
        )
    }

    /// 目标站点主动拒绝了访问（映射为 429 而不是 502）
    pub fn is_access_denial(&self) -> bool {
        matches!(
            self,
            Classification::RateLimited
                | Classification::BotChallenge
                | Classification::LoginRequired
                | Classification::Forbidden
        )
    }

    /// 面向调用方的简短说明
    pub fn describe(&self) -> &'static str {
        match self {
            Classification::Ok => "page loaded",
            Classification::EmptyResponse => "the page rendered no content",
            Classification::LoginRequired => "the job page requires a logged-in session",
            Classification::BotChallenge => "the site served an automated-traffic challenge",
            Classification::Forbidden => "the site denied access to the job page",
            Classification::RateLimited => "the site is rate limiting requests",
            Classification::ServerError => "the site returned a server error",
            Classification::Timeout => "navigation did not finish before the deadline",
            Classification::TransportFailure => "the browser could not reach the site",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
