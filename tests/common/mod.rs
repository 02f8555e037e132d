// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 测试替身
//!
//! 用内存缓冲区代替真实的 Socket，并可以在指定步骤注入失败。

#![allow(dead_code)]

use http_exchange::{Connection, Request, RequestHandler, Response};
use mockall::mock;

use std::{
    cell::RefCell,
    fmt,
    io::{self, Cursor, Read, Write},
};

/// 连接在哪一步失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Nothing,
    GettingInput,
    ReadingInput,
    GettingOutput,
    WritingOutput,
    Closing,
}

pub struct InputDouble {
    data: Cursor<Vec<u8>>,
    fail: bool,
}

impl Read for InputDouble {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "read failed"));
        }
        self.data.read(buf)
    }
}

pub struct OutputDouble {
    buffer: Vec<u8>,
    fail: bool,
}

impl Write for OutputDouble {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write failed"));
        }
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 内存中的连接
pub struct ConnectionDouble {
    input: InputDouble,
    output: OutputDouble,
    failure: Failure,
    closed: bool,
    close_calls: usize,
}

impl ConnectionDouble {
    pub fn new(raw: &str) -> Self {
        Self::failing(raw, Failure::Nothing)
    }

    pub fn from_bytes(raw: &[u8]) -> Self {
        Self::build(raw.to_vec(), Failure::Nothing)
    }

    pub fn failing(raw: &str, failure: Failure) -> Self {
        Self::build(raw.as_bytes().to_vec(), failure)
    }

    fn build(raw: Vec<u8>, failure: Failure) -> Self {
        Self {
            input: InputDouble {
                data: Cursor::new(raw),
                fail: failure == Failure::ReadingInput,
            },
            output: OutputDouble {
                buffer: Vec::new(),
                fail: failure == Failure::WritingOutput,
            },
            failure,
            closed: false,
            close_calls: 0,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// `close()` 被调用的次数（包括失败的调用）
    pub fn close_calls(&self) -> usize {
        self.close_calls
    }

    /// 已从输入中读走的字节数
    pub fn bytes_read(&self) -> u64 {
        self.input.data.position()
    }

    /// 已写出的字节
    pub fn written(&self) -> &[u8] {
        &self.output.buffer
    }

    pub fn written_str(&self) -> String {
        String::from_utf8_lossy(&self.output.buffer).to_string()
    }
}

impl Connection for ConnectionDouble {
    fn input(&mut self) -> io::Result<&mut dyn Read> {
        if self.failure == Failure::GettingInput {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "no input"));
        }
        Ok(&mut self.input)
    }

    fn output(&mut self) -> io::Result<&mut dyn Write> {
        if self.failure == Failure::GettingOutput {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "no output"));
        }
        Ok(&mut self.output)
    }

    fn close(&mut self) -> io::Result<()> {
        self.close_calls += 1;
        if self.failure == Failure::Closing {
            return Err(io::Error::new(io::ErrorKind::Other, "close failed"));
        }
        self.closed = true;
        Ok(())
    }
}

/// 返回固定响应，并记录收到的请求
pub struct RequestHandlerDouble {
    response: Response,
    received: RefCell<Option<Request>>,
}

impl RequestHandlerDouble {
    pub fn new(response: Response) -> Self {
        Self {
            response,
            received: RefCell::new(None),
        }
    }

    pub fn received_request(&self) -> Option<Request> {
        self.received.borrow().clone()
    }
}

impl RequestHandler for RequestHandlerDouble {
    type Error = HandlerFailure;

    fn handle(&self, request: &Request) -> Result<Response, HandlerFailure> {
        *self.received.borrow_mut() = Some(request.clone());
        Ok(self.response.clone())
    }
}

/// 应用处理器的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure(pub &'static str);

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler failed: {}", self.0)
    }
}

impl std::error::Error for HandlerFailure {}

mock! {
    pub Handler {}

    impl RequestHandler for Handler {
        type Error = HandlerFailure;

        fn handle(&self, request: &Request) -> Result<Response, HandlerFailure>;
    }
}

pub fn null_response() -> Response {
    Response::new(200, "OK", "")
}
