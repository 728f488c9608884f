// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供退避策略、URL 规范化与日志初始化等通用功能
pub mod retry_policy;
pub mod telemetry;
pub mod url_utils;
