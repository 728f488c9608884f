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

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 抓取请求数据传输对象
///
/// 查询参数使用 `jobId`，JSON 请求体同时接受 `job_id`
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ScrapeRequestDto {
    /// 职位标识符，也可以是完整的职位 URL
    #[serde(rename = "jobId", alias = "job_id", default)]
    #[validate(length(max = 2048))]
    pub job_id: Option<String>,
    /// 职位页面 URL
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub url: Option<String>,
}

impl ScrapeRequestDto {
    /// 调用方提供的原始输入，`jobId` 优先
    pub fn raw_input(&self) -> Option<&str> {
        non_blank(self.job_id.as_deref()).or_else(|| non_blank(self.url.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
