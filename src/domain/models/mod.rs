// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 抓取目标（scrape_target）：规范化后的职位页面地址
/// - 分类标签（classification）：页面加载结果的判定
/// - 尝试结果（attempt）：单次浏览器会话的结果与遥测数据
/// - 职位记录（job_record）：从页面中提取的字段
/// - 抓取结果（scrape_result）：一次请求的终态结果
pub mod attempt;
pub mod classification;
pub mod job_record;
pub mod scrape_result;
pub mod scrape_target;
