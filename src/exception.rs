// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了一次请求/响应交换过程中，传输层与协议解析层可能出现的各类异常。
//!
//! ## 设计意图
//! - **错误分类**：涵盖了连接获取错误、请求解析错误、写出错误以及关闭错误。
//! - **就地消化**：这些异常全部由 `Http` 在内部记录日志后吞掉，只会导致连接被关闭，
//!   不会越过 `Http::handle` 的边界。应用处理器返回的错误不属于这里，它们使用处理器自己的错误类型。
//! - **可复制**：底层的 `io::Error` 被归约为 `io::ErrorKind`，因此整个枚举保持 `Copy`。

use std::{fmt, io};

/// 一次交换过程中发生的传输层或协议层异常。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Exception {
    /// 无法从连接获取输入流。
    InputUnavailable(io::ErrorKind),
    /// 无法从连接获取输出流。
    OutputUnavailable(io::ErrorKind),
    /// 请求行缺失、不完整（没有行终止符）或字段数量不正确。
    MalformedRequestLine,
    /// 头部行没有以 CRLF 结尾、在流结束处被截断，或者缺少 `": "` 分隔符。
    MalformedHeader,
    /// 请求行与头部的总字节数达到上限时仍未结束。
    HeaderTooLarge { limit: u64 },
    /// 请求行或头部名包含非法的 UTF-8 字节。
    RequestIsNotUtf8,
    /// `Content-Length` 声明的字节数多于流结束前实际可读取的字节数。
    TruncatedBody { expected: u64, received: u64 },
    /// `Content-Length` 超过了解析器允许的请求体上限。
    BodyTooLarge { declared: u64, limit: u64 },
    /// 读取输入流时发生 I/O 错误。
    ReadFailed(io::ErrorKind),
    /// 写出响应时发生 I/O 错误。
    WriteFailed(io::ErrorKind),
    /// 关闭连接失败。
    CloseFailed(io::ErrorKind),
}

use Exception::*;

impl Exception {
    /// 是否为请求解析阶段产生的异常
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            MalformedRequestLine
                | MalformedHeader
                | RequestIsNotUtf8
                | HeaderTooLarge { .. }
                | TruncatedBody { .. }
                | BodyTooLarge { .. }
                | ReadFailed(_)
        )
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputUnavailable(kind) => write!(f, "Couldn't acquire connection input: {}", kind),
            OutputUnavailable(kind) => write!(f, "Couldn't acquire connection output: {}", kind),
            MalformedRequestLine => write!(f, "Request line is missing or malformed"),
            MalformedHeader => write!(f, "Header line is malformed"),
            RequestIsNotUtf8 => write!(f, "Request bytes can't be parsed in UTF-8"),
            HeaderTooLarge { limit } => {
                write!(f, "Request head exceeds the limit of {} bytes", limit)
            }
            TruncatedBody { expected, received } => write!(
                f,
                "Message body truncated: expected {} bytes, received {}",
                expected, received
            ),
            BodyTooLarge { declared, limit } => write!(
                f,
                "Message body too large: declared {} bytes, limit {}",
                declared, limit
            ),
            ReadFailed(kind) => write!(f, "Reading the request failed: {}", kind),
            WriteFailed(kind) => write!(f, "Writing the response failed: {}", kind),
            CloseFailed(kind) => write!(f, "Closing the connection failed: {}", kind),
        }
    }
}

impl std::error::Error for Exception {}
