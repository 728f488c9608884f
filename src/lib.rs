// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 请求载荷与抓取用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 抓取目标、页面分类、字段提取与重试编排
pub mod domain;

/// 引擎模块
///
/// 浏览器会话抽象、Chromium 实现与单次尝试执行器
pub mod engines;

/// 基础设施模块
///
/// 指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
