// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 页面分类（page_classifier）：判定一次页面加载的结果
/// - 字段提取（field_extractor）：从渲染后的文档中读取职位字段
/// - 重试编排（retry_orchestrator）：驱动多次尝试并汇总结果
pub mod field_extractor;
pub mod page_classifier;
pub mod retry_orchestrator;
