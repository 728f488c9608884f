// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义抓取接口的请求与响应载荷
pub mod scrape_request;
pub mod scrape_response;
