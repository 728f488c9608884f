// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::domain::models::job_record::JobRecord;

/// 字段提取错误
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Document has no markup")]
    EmptyDocument,
}

/// 字段提取器
///
/// 输入渲染完成的文档标记，输出扁平的职位记录。
pub trait FieldExtractor: Send + Sync {
    fn extract(&self, markup: &str) -> Result<JobRecord, ExtractionError>;
}

const TITLE: &str = "h1[data-test='job-header-title'], h1";
const DESCRIPTION: &str = "[data-test='job-description'], section[data-test='job-description']";
const CATEGORY: &str =
    "[data-test='job-features'] [data-test='job-category'], [data-test='breadcrumb'] a:nth-child(2)";
const SUBCATEGORY: &str = "[data-test='job-features'] [data-test='job-subcategory'], [data-test='breadcrumb'] a:nth-child(3)";
const EXPERIENCE_LEVEL: &str = "[data-test='experience-level']";
const PROJECT_LENGTH: &str = "[data-test='project-length']";
const HOURLY_RANGE: &str = "[data-test='job-type-hourly'], [data-test='budget-hourly']";
const FIXED_BUDGET: &str = "[data-test='job-type-fixed'], [data-test='budget-fixed']";
const CLIENT_COUNTRY: &str = "[data-test='client-location']";
const CLIENT_RATING: &str = "[data-test='client-feedback']";
const CLIENT_TOTAL_SPENT: &str = "[data-test='client-spend']";
const CLIENT_HIRES: &str = "[data-test='client-hires']";
const CLIENT_PAYMENT_VERIFIED: &str = "[data-test='payment-verification-status']";

/// 职位描述元素，尝试执行器用它判断页面是否渲染完成
pub const DESCRIPTION_READY_SELECTOR: &str = "[data-test='job-description']";

fn compile(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// 安全查找
///
/// 取选择器命中的第一个元素并交给 `read` 读取，结果去除首尾空白。
/// 元素缺失或内容为空时返回 `None`，从不报错。
pub fn safe_lookup<F>(document: &Html, selector: &Selector, read: F) -> Option<String>
where
    F: Fn(ElementRef<'_>) -> String,
{
    document
        .select(selector)
        .next()
        .map(read)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// Text nodes are concatenated as rendered, then whitespace runs collapse to one space.
fn element_text(element: ElementRef<'_>) -> String {
    let text = element.text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_html(element: ElementRef<'_>) -> String {
    element.inner_html()
}

/// 基于 CSS 选择器的字段提取器
///
/// 选择器在构造时编译一次，之后可在多个请求间共享。
pub struct SelectorExtractor {
    title: Selector,
    description: Selector,
    category: Selector,
    subcategory: Selector,
    experience_level: Selector,
    project_length: Selector,
    hourly_range: Selector,
    fixed_budget: Selector,
    client_country: Selector,
    client_rating: Selector,
    client_total_spent: Selector,
    client_hires: Selector,
    client_payment_verified: Selector,
}

impl SelectorExtractor {
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            title: compile(TITLE)?,
            description: compile(DESCRIPTION)?,
            category: compile(CATEGORY)?,
            subcategory: compile(SUBCATEGORY)?,
            experience_level: compile(EXPERIENCE_LEVEL)?,
            project_length: compile(PROJECT_LENGTH)?,
            hourly_range: compile(HOURLY_RANGE)?,
            fixed_budget: compile(FIXED_BUDGET)?,
            client_country: compile(CLIENT_COUNTRY)?,
            client_rating: compile(CLIENT_RATING)?,
            client_total_spent: compile(CLIENT_TOTAL_SPENT)?,
            client_hires: compile(CLIENT_HIRES)?,
            client_payment_verified: compile(CLIENT_PAYMENT_VERIFIED)?,
        })
    }
}

impl FieldExtractor for SelectorExtractor {
    fn extract(&self, markup: &str) -> Result<JobRecord, ExtractionError> {
        if markup.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let document = Html::parse_document(markup);
        let text = |selector: &Selector| safe_lookup(&document, selector, element_text);

        Ok(JobRecord {
            job_title: text(&self.title),
            job_description: text(&self.description),
            job_description_html: safe_lookup(&document, &self.description, element_html),
            category: text(&self.category),
            subcategory: text(&self.subcategory),
            experience_level: text(&self.experience_level),
            project_length: text(&self.project_length),
            hourly_range: text(&self.hourly_range),
            fixed_budget: text(&self.fixed_budget),
            client_country: text(&self.client_country),
            client_rating: text(&self.client_rating),
            client_total_spent: text(&self.client_total_spent),
            client_hires: text(&self.client_hires),
            client_payment_verified: text(&self.client_payment_verified),
            raw_job_html: Some(markup.to_string()),
        })
    }
}
