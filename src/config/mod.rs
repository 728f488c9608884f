// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理服务器、抓取重试、浏览器与指标的配置设置
pub mod settings;
