// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：抓取目标、分类标签、尝试结果和职位记录
/// - 服务（services）：页面分类、字段提取和重试编排
///
/// 领域层不依赖浏览器实现，浏览器能力通过 `engines` 中的特质注入。
pub mod models;
pub mod services;
