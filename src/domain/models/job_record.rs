// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 职位记录
///
/// 从渲染后的职位页面中提取出的扁平字段集合。
/// 每个字段独立可空：选择器未命中或文本为空时为 `None`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// 职位标题
    pub job_title: Option<String>,
    /// 职位描述（纯文本）
    pub job_description: Option<String>,
    /// 职位描述（HTML 片段）
    pub job_description_html: Option<String>,
    /// 一级分类
    pub category: Option<String>,
    /// 二级分类
    pub subcategory: Option<String>,
    /// 经验要求
    pub experience_level: Option<String>,
    /// 项目周期
    pub project_length: Option<String>,
    /// 时薪范围
    pub hourly_range: Option<String>,
    /// 固定预算
    pub fixed_budget: Option<String>,
    /// 客户所在国家
    pub client_country: Option<String>,
    /// 客户评分
    pub client_rating: Option<String>,
    /// 客户累计支出
    pub client_total_spent: Option<String>,
    /// 客户雇佣次数
    pub client_hires: Option<String>,
    /// 客户付款方式是否已验证
    pub client_payment_verified: Option<String>,
    /// 完整页面标记
    pub raw_job_html: Option<String>,
}
