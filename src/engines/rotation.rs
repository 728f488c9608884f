// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engines::traits::{ClientIdentity, Viewport};

/// 轮询选择器
///
/// 只读列表加一个原子游标，进程内共享，无需加锁。
#[derive(Debug)]
pub struct RoundRobin<T> {
    items: Vec<T>,
    cursor: AtomicUsize,
}

impl<T: Clone> RoundRobin<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: AtomicUsize::new(0),
        }
    }

    /// 取下一个元素，列表为空时返回 `None`
    pub fn pick(&self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.items.len();
        Some(self.items[index].clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 上游代理池
pub type ProxyPool = RoundRobin<String>;

/// 客户端身份池
pub type IdentityPool = RoundRobin<ClientIdentity>;

impl ProxyPool {
    /// 解析逗号分隔的代理列表，空串表示不使用代理
    pub fn from_list(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

const DESKTOP_IDENTITIES: &[(&str, u32, u32)] = &[
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        1280,
        720,
    ),
    (
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
        1440,
        900,
    ),
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
        1366,
        768,
    ),
    (
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        1920,
        1080,
    ),
    (
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
        1536,
        864,
    ),
];

impl IdentityPool {
    /// 内置的桌面浏览器身份表
    pub fn desktop() -> Self {
        Self::new(
            DESKTOP_IDENTITIES
                .iter()
                .map(|(user_agent, width, height)| ClientIdentity {
                    user_agent: (*user_agent).to_string(),
                    viewport: Viewport {
                        width: *width,
                        height: *height,
                    },
                })
                .collect(),
        )
    }
}
