// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 协议参数与常量模块
//!
//! 该模块定义了请求解析与响应格式化共用的 HTTP 协议常量，包括：
//! - 报文中的分隔符（行终止符、头部名值分隔符）。
//! - 常见的 HTTP 状态码及其原因短语（Reason Phrase）。

use lazy_static::lazy_static;
use std::collections::HashMap;

/// 响应报文使用的行终止符。状态行与头部行统一使用单个 LF。
pub const LF: &str = "\n";

/// 请求头部行的终止符（Carriage Return Line Feed）
pub const CRLF: &str = "\r\n";

/// 头部名与值之间的分隔符，仅第一次出现有效
pub const HEADER_SEPARATOR: &str = ": ";

/// 响应状态行中的协议版本
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// 决定请求体长度的头部字段名（按原样大小写匹配）
pub const CONTENT_LENGTH: &str = "Content-Length";

/// 请求行与全部头部合计的默认字节上限：32 KiB
pub const DEFAULT_MAX_HEADER_SIZE: u64 = 32 * 1024;

/// 请求体的默认大小上限：16 MiB
pub const DEFAULT_MAX_BODY_SIZE: u64 = 16 * 1024 * 1024;

lazy_static! {
    /// HTTP 状态码与其对应的标准原因短语映射表。
    ///
    /// 参考标准：[RFC 9110: HTTP Semantics](https://www.rfc-editor.org/rfc/rfc9110.html)。
    pub static ref STATUS_CODES: HashMap<u16, &'static str> = {
        let mut map = HashMap::new();
        // 1xx: 信息响应 (Informational)
        map.insert(100, "Continue");
        map.insert(101, "Switching Protocols");

        // 2xx: 成功响应 (Successful)
        map.insert(200, "OK");
        map.insert(201, "Created");
        map.insert(202, "Accepted");
        map.insert(203, "Non-Authoritative Information");
        map.insert(204, "No Content");
        map.insert(205, "Reset Content");
        map.insert(206, "Partial Content");

        // 3xx: 重定向 (Redirection)
        map.insert(300, "Multiple Choices");
        map.insert(301, "Moved Permanently");
        map.insert(302, "Found");
        map.insert(303, "See Other");
        map.insert(304, "Not Modified");
        map.insert(307, "Temporary Redirect");
        map.insert(308, "Permanent Redirect");

        // 4xx: 客户端错误 (Client Error)
        map.insert(400, "Bad Request");
        map.insert(401, "Unauthorized");
        map.insert(403, "Forbidden");
        map.insert(404, "Not Found");
        map.insert(405, "Method Not Allowed");
        map.insert(406, "Not Acceptable");
        map.insert(408, "Request Timeout");
        map.insert(409, "Conflict");
        map.insert(410, "Gone");
        map.insert(411, "Length Required");
        map.insert(413, "Content Too Large");
        map.insert(414, "URI Too Long");
        map.insert(415, "Unsupported Media Type");
        map.insert(418, "I'm a teapot");
        map.insert(422, "Unprocessable Content");
        map.insert(426, "Upgrade Required");

        // 5xx: 服务端错误 (Server Error)
        map.insert(500, "Internal Server Error");
        map.insert(501, "Not Implemented");
        map.insert(502, "Bad Gateway");
        map.insert(503, "Service Unavailable");
        map.insert(504, "Gateway Timeout");
        map.insert(505, "HTTP Version Not Supported");
        map
    };
}

/// 查询状态码对应的原因短语，表中不存在的状态码返回 `"Unknown"`。
pub fn status_text(code: u16) -> &'static str {
    STATUS_CODES.get(&code).copied().unwrap_or("Unknown")
}
