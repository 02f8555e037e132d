// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 连接生命周期编排
//!
//! `Http` 把一次交换串成固定的步骤：取得输入 → 解析请求 → 调用处理器 → 写出响应 → 关闭连接。
//!
//! ## 异常策略
//! - 取得输入、解析请求、取得输出、写出响应、关闭连接的失败都只记录日志，随后直接进入关闭步骤。
//! - 处理器返回的错误会在连接关闭**之后**原样返回给调用方。
//! - 无论走哪条路径，连接都恰好关闭一次。

use crate::{
    connection::Connection,
    exception::Exception,
    request::{Request, RequestParser},
    response::Response,
};

use log::{debug, error, info, warn};
use std::{
    io::BufReader,
    ops::{Deref, DerefMut},
};

/// 应用提供的请求处理器。
///
/// 任何 `Fn(&Request) -> Result<Response, E>` 闭包都自动实现该 trait。
pub trait RequestHandler {
    type Error;

    fn handle(&self, request: &Request) -> Result<Response, Self::Error>;
}

impl<F, E> RequestHandler for F
where
    F: Fn(&Request) -> Result<Response, E>,
{
    type Error = E;

    fn handle(&self, request: &Request) -> Result<Response, E> {
        self(request)
    }
}

/// 单次请求/响应交换的编排器。
///
/// 自身只持有不可变状态，处理器满足 `Sync` 时可以放进 `Arc` 在多个接入线程之间共享。
#[derive(Debug)]
pub struct Http<H> {
    handler: H,
    parser: RequestParser,
}

impl<H: RequestHandler> Http<H> {
    pub fn new(handler: H) -> Self {
        Self::with_parser(handler, RequestParser::new())
    }

    pub fn with_parser(handler: H, parser: RequestParser) -> Self {
        Self { handler, parser }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// 在给定连接上完成一次交换，返回前总会关闭连接。
    ///
    /// # 返回值
    /// * `Ok(())` - 交换完成，或者因传输/解析错误被放弃（错误已记录日志）。
    /// * `Err(e)` - 处理器返回了错误 `e`，此时连接已经关闭。
    pub fn handle<C: Connection + ?Sized>(&self, connection: &mut C) -> Result<(), H::Error> {
        let mut connection = ClosingGuard { connection };
        let result = self.exchange(&mut *connection);
        // 先关闭，再把处理器的错误交给调用方
        drop(connection);
        result
    }

    fn exchange<C: Connection + ?Sized>(&self, connection: &mut C) -> Result<(), H::Error> {
        let request = match self.read_request(connection) {
            Ok(request) => request,
            Err(e) if e.is_parse_error() => {
                warn!("解析HTTP请求失败：{}，不调用处理器", e);
                return Ok(());
            }
            Err(e) => {
                error!("{}，放弃本次交换", e);
                return Ok(());
            }
        };
        debug!("成功解析HTTP请求：{} {}", request.method(), request.uri());

        let response = match self.handler.handle(&request) {
            Ok(response) => response,
            Err(e) => {
                error!(
                    "处理器在处理{} {}时返回错误，关闭连接后向上传递",
                    request.method(),
                    request.uri()
                );
                return Err(e);
            }
        };

        match write_response(connection, &response) {
            Ok(()) => log_exchange(&request, &response),
            Err(e) => error!("{}", e),
        }
        Ok(())
    }

    fn read_request<C: Connection + ?Sized>(
        &self,
        connection: &mut C,
    ) -> Result<Request, Exception> {
        let input = connection
            .input()
            .map_err(|e| Exception::InputUnavailable(e.kind()))?;
        let mut reader = BufReader::new(input);
        self.parser.parse(&mut reader)
    }
}

fn write_response<C: Connection + ?Sized>(
    connection: &mut C,
    response: &Response,
) -> Result<(), Exception> {
    let output = connection
        .output()
        .map_err(|e| Exception::OutputUnavailable(e.kind()))?;
    response
        .write_to(output)
        .map_err(|e| Exception::WriteFailed(e.kind()))
}

fn log_exchange(request: &Request, response: &Response) {
    info!(
        "{}, {}, {}, {}, {}",
        request.method(),
        request.uri(),
        request.version().unwrap_or("-"),
        response.status_code(),
        response.body().len(),
    );
}

/// 在离开作用域时关闭连接，处理器 panic 时同样生效。关闭失败只记录日志。
struct ClosingGuard<'a, C: Connection + ?Sized> {
    connection: &'a mut C,
}

impl<C: Connection + ?Sized> Deref for ClosingGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.connection
    }
}

impl<C: Connection + ?Sized> DerefMut for ClosingGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.connection
    }
}

impl<C: Connection + ?Sized> Drop for ClosingGuard<'_, C> {
    fn drop(&mut self) {
        match self.connection.close() {
            Ok(()) => debug!("连接已关闭"),
            Err(e) => warn!("{}", Exception::CloseFailed(e.kind())),
        }
    }
}
