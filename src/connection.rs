// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 连接抽象
//!
//! `Connection` 描述了一次请求/响应交换所需要的全部能力：取得输入流、取得输出流、关闭连接。
//! 底层传输（Socket 等）的所有权始终属于外部的接入方，`Http` 只在一次 `handle` 调用期间借用它。

use log::debug;
use std::{
    io::{self, Read, Write},
    net::{Shutdown, SocketAddr, TcpStream},
};

/// 一次交换所使用的连接。
///
/// 三个操作都可能失败，失败的处理策略由 `Http` 决定。测试中可以用内存缓冲区实现该 trait。
pub trait Connection {
    /// 取得输入字节流
    fn input(&mut self) -> io::Result<&mut dyn Read>;

    /// 取得输出字节流
    fn output(&mut self) -> io::Result<&mut dyn Write>;

    /// 关闭连接
    fn close(&mut self) -> io::Result<()>;
}

/// 基于阻塞式 `TcpStream` 的连接。
///
/// 读写超时等传输层策略应在构造之前由调用方设置在 `TcpStream` 上。
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    peer: Option<SocketAddr>,
}

impl TcpConnection {
    pub fn new(stream: TcpStream) -> Self {
        let peer = stream.peer_addr().ok();
        Self { stream, peer }
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }
}

impl Connection for TcpConnection {
    fn input(&mut self) -> io::Result<&mut dyn Read> {
        Ok(&mut self.stream)
    }

    fn output(&mut self) -> io::Result<&mut dyn Write> {
        Ok(&mut self.stream)
    }

    fn close(&mut self) -> io::Result<()> {
        self.stream.flush()?;
        // 对端先断开时 shutdown 会返回 NotConnected，此时连接已经处于关闭状态
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => {
                debug!("连接{:?}已被对端关闭", self.peer);
                Ok(())
            }
            other => other,
        }
    }
}
