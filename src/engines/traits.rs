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

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 浏览器会话错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    /// 浏览器启动失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 协议层错误
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl SessionError {
    /// 是否由截止时间触发
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout)
    }
}

/// 浏览器视口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 客户端身份（User-Agent 与视口）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientIdentity {
    pub user_agent: String,
    pub viewport: Viewport,
}

/// 会话启动参数
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// 本次会话使用的客户端身份
    pub identity: ClientIdentity,
    /// 上游代理地址
    pub proxy: Option<String>,
    /// 导航超时时间
    pub navigation_timeout: Duration,
}

/// 浏览器会话
///
/// 每个会话拥有独立的浏览器进程与上下文，只服务于一次尝试。
/// 调用方在任何退出路径上都必须恰好调用一次 `close`。
#[async_trait]
pub trait BrowserSession: Send {
    /// 导航到目标地址，返回主文档的 HTTP 状态码（若可获得）
    async fn navigate(&mut self, url: &str) -> Result<Option<u16>, SessionError>;

    /// 等待网络静默
    async fn wait_for_network_idle(&mut self, timeout: Duration) -> Result<(), SessionError>;

    /// 等待选择器命中的元素出现
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<(), SessionError>;

    /// 当前渲染的完整标记
    async fn content(&mut self) -> Result<String, SessionError>;

    /// 重定向后的最终地址
    async fn current_url(&mut self) -> Result<String, SessionError>;

    /// 释放会话持有的全部资源
    async fn close(&mut self);
}

/// 浏览器会话启动器
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    /// 启动一个全新的隔离会话
    async fn launch(&self, options: &SessionOptions) -> Result<Box<dyn BrowserSession>, SessionError>;

    /// 启动器名称
    fn name(&self) -> &'static str;
}
