// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求解析模块
//!
//! 该模块负责把连接输入流中的原始字节解析为强类型的 `Request` 结构体。它涵盖了：
//! 1. 请求行（Request-Line）的解析（方法、路径、版本），接受 LF 或 CRLF 作为终止符。
//! 2. 头部（Headers）的解析，头部行严格以 CRLF 结尾。
//! 3. 基于 `Content-Length` 的请求体分帧。
//!
//! 解析器只认识字节流，不了解连接或 Socket。

use crate::{exception::Exception, param::*};
use bytes::Bytes;
use log::{debug, warn};
use std::{
    collections::HashMap,
    io::{BufRead, Read},
};

/// 表示一个完整的 HTTP 请求。
///
/// 只能由 `RequestParser` 构造，构造完成后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP 请求方法，按原样保存（例如 `GET`）
    method: String,
    /// 请求的资源路径（包含查询字符串）
    uri: String,
    /// 请求行中的协议版本；请求行只有两段时为 `None`
    version: Option<String>,
    /// 头部字段，名称唯一，大小写按原样保存
    headers: HashMap<String, String>,
    /// 由 `Content-Length` 分帧得到的请求体
    message_body: Bytes,
}

impl Request {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// 按原样大小写查找头部字段
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn message_body(&self) -> &Bytes {
        &self.message_body
    }
}

/// 请求解析器。
///
/// 可配置两个上限：请求行与头部的总字节数，以及请求体大小。
/// 头部逐行读取时受剩余额度约束；超过上限的 `Content-Length` 会在读取前被拒绝。
#[derive(Debug, Clone, Copy)]
pub struct RequestParser {
    max_header_size: u64,
    max_body_size: u64,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self {
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_body_size(max_body_size: u64) -> Self {
        Self {
            max_body_size,
            ..Self::default()
        }
    }

    pub fn with_limits(max_header_size: u64, max_body_size: u64) -> Self {
        Self {
            max_header_size,
            max_body_size,
        }
    }

    pub fn max_header_size(&self) -> u64 {
        self.max_header_size
    }

    pub fn max_body_size(&self) -> u64 {
        self.max_body_size
    }

    /// 从带缓冲的字节流中解析出一个 `Request`。
    ///
    /// # 逻辑步骤
    /// 1. 读取请求行并拆分出方法、路径和（可选的）协议版本。
    /// 2. 逐行读取头部，直到遇到空行或流结束。
    /// 3. 若存在可解析的 `Content-Length`，恰好读取该数量的字节作为请求体，
    ///    多余的字节不属于本次请求；可读字节不足时返回 `Exception::TruncatedBody`。
    ///
    /// 请求行与头部共用 `max_header_size` 的额度，用完时返回 `Exception::HeaderTooLarge`。
    ///
    /// # 错误处理
    /// 任何格式错误或读取错误都会以 `Exception` 返回，由调用方决定如何处置。
    pub fn parse<R: BufRead + ?Sized>(&self, reader: &mut R) -> Result<Request, Exception> {
        let mut head = HeadReader {
            reader: &mut *reader,
            remaining: self.max_header_size,
            limit: self.max_header_size,
        };
        let (method, uri, version) = read_request_line(&mut head)?;
        let headers = read_headers(&mut head)?;

        let message_body = match content_length(&headers) {
            Some(expected) => self.read_body(reader, expected)?,
            // 没有 Content-Length 时不读取任何剩余字节
            None => Bytes::new(),
        };

        debug!(
            "请求解析完成：{} {}，{}个头部字段，请求体{}字节",
            method,
            uri,
            headers.len(),
            message_body.len()
        );

        Ok(Request {
            method,
            uri,
            version,
            headers,
            message_body,
        })
    }

    /// 直接从内存中的字节切片解析请求
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Request, Exception> {
        let mut cursor = bytes;
        self.parse(&mut cursor)
    }

    fn read_body<R: BufRead + ?Sized>(
        &self,
        reader: &mut R,
        expected: u64,
    ) -> Result<Bytes, Exception> {
        if expected > self.max_body_size {
            warn!(
                "Content-Length {} 超过请求体上限 {}",
                expected, self.max_body_size
            );
            return Err(Exception::BodyTooLarge {
                declared: expected,
                limit: self.max_body_size,
            });
        }

        // 不按声明长度预分配，避免客户端用虚假的长度占用内存
        let mut body = Vec::with_capacity(expected.min(8192) as usize);
        let received = Read::take(&mut *reader, expected)
            .read_to_end(&mut body)
            .map_err(|e| Exception::ReadFailed(e.kind()))? as u64;

        if received < expected {
            warn!("请求体不完整：声明{}字节，实际{}字节", expected, received);
            return Err(Exception::TruncatedBody { expected, received });
        }
        Ok(Bytes::from(body))
    }
}

/// 按行读取请求头部分，所有行共用一份字节额度
struct HeadReader<'a, R: BufRead + ?Sized> {
    reader: &'a mut R,
    remaining: u64,
    limit: u64,
}

impl<R: BufRead + ?Sized> HeadReader<'_, R> {
    /// 读取一行（包含终止符）。流结束时返回的行可能没有终止符或为空。
    fn read_line(&mut self) -> Result<Vec<u8>, Exception> {
        let mut buffer = Vec::new();
        let n = Read::take(&mut *self.reader, self.remaining)
            .read_until(b'\n', &mut buffer)
            .map_err(|e| Exception::ReadFailed(e.kind()))? as u64;
        self.remaining -= n;

        if self.remaining == 0 && !buffer.ends_with(LF.as_bytes()) {
            warn!("请求行与头部超过{}字节上限", self.limit);
            return Err(Exception::HeaderTooLarge { limit: self.limit });
        }
        Ok(buffer)
    }
}

/// 读取请求行。LF 是必需的终止符，其前面的 CR 可有可无。
fn read_request_line<R: BufRead + ?Sized>(
    head: &mut HeadReader<'_, R>,
) -> Result<(String, String, Option<String>), Exception> {
    let buffer = head.read_line()?;

    let line = match buffer.strip_suffix(LF.as_bytes()) {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => {
            warn!("请求行不完整：{:?}", String::from_utf8_lossy(&buffer));
            return Err(Exception::MalformedRequestLine);
        }
    };
    let line = std::str::from_utf8(line).map_err(|_| Exception::RequestIsNotUtf8)?;

    let parts: Vec<&str> = line.split_ascii_whitespace().collect();
    let (method, uri, version) = match parts.as_slice() {
        [method, uri] => (method, uri, None),
        [method, uri, version] => (method, uri, Some(version.to_string())),
        _ => {
            warn!("HTTP请求行格式不正确：{}", line);
            return Err(Exception::MalformedRequestLine);
        }
    };
    if !uri.starts_with('/') {
        warn!("请求路径必须以/开头：{}", uri);
        return Err(Exception::MalformedRequestLine);
    }
    Ok((method.to_string(), uri.to_string(), version))
}

/// 读取头部块。每一行都必须以 CRLF 结尾；流在行首结束视为头部块结束。
///
/// 头部名必须是合法的 UTF-8；头部值中的非 UTF-8 字节（如 Latin-1 的 obs-text）
/// 按替换字符解码，不拒绝整个请求。
fn read_headers<R: BufRead + ?Sized>(
    head: &mut HeadReader<'_, R>,
) -> Result<HashMap<String, String>, Exception> {
    let mut headers = HashMap::new();
    loop {
        let buffer = head.read_line()?;
        if buffer.is_empty() {
            break;
        }

        let line = match buffer.strip_suffix(CRLF.as_bytes()) {
            Some(line) => line,
            None => {
                warn!("头部行没有以CRLF结尾：{:?}", String::from_utf8_lossy(&buffer));
                return Err(Exception::MalformedHeader);
            }
        };
        if line.is_empty() {
            break;
        }

        let separator = HEADER_SEPARATOR.as_bytes();
        let position = match line.windows(separator.len()).position(|w| w == separator) {
            Some(position) => position,
            None => {
                warn!("头部行缺少分隔符：{}", String::from_utf8_lossy(line));
                return Err(Exception::MalformedHeader);
            }
        };
        let name = std::str::from_utf8(&line[..position])
            .map_err(|_| Exception::RequestIsNotUtf8)?;
        let value = String::from_utf8_lossy(&line[position + separator.len()..]).into_owned();

        if headers.insert(name.to_string(), value).is_some() {
            debug!("重复的头部字段{}，保留最后一次出现的值", name);
        }
    }
    Ok(headers)
}

fn content_length(headers: &HashMap<String, String>) -> Option<u64> {
    let value = headers.get(CONTENT_LENGTH)?;
    match value.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("无法解析的Content-Length：{}，按无请求体处理", value);
            None
        }
    }
}
