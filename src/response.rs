// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

use crate::param::*;

use bytes::Bytes;
use std::io::{self, Write};

/// 应用处理器返回的 HTTP 响应。构造完成后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    status_text: String,
    body: Bytes,
}

impl Response {
    pub fn new(status_code: u16, status_text: &str, body: impl Into<Bytes>) -> Self {
        Self {
            status_code,
            status_text: status_text.to_string(),
            body: body.into(),
        }
    }

    /// 使用状态码表中的标准原因短语构造响应
    pub fn from_status_code(code: u16, body: impl Into<Bytes>) -> Self {
        Self::new(code, status_text(code), body)
    }

    /// 格式化为线上字节序列。
    ///
    /// `Content-Length` 总是由实际的响应体长度计算得出。状态行与头部行使用 LF 结尾，
    /// 空行之后紧跟响应体，末尾不追加任何终止符。
    pub fn as_bytes(&self) -> Vec<u8> {
        let status_code: &str = &self.status_code.to_string();
        let status_text: &str = &self.status_text;
        let content_length: &str = &self.body.len().to_string();

        let header = [
            HTTP_VERSION,
            " ",
            status_code,
            " ",
            status_text,
            LF,
            CONTENT_LENGTH,
            HEADER_SEPARATOR,
            content_length,
            LF,
            LF,
        ]
        .concat();
        [header.as_bytes(), &self.body[..]].concat()
    }

    /// 把格式化后的响应写入输出流并刷新
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.as_bytes())?;
        writer.flush()
    }
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
