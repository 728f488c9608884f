// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 连接 HTTP 层与领域层：请求/响应载荷以及抓取用例
pub mod dto;
pub mod usecases;
