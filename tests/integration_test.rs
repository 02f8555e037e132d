// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 回环 TCP 集成测试
//!
//! 在 127.0.0.1 的随机端口上接收一个真实连接，用 `TcpConnection` 完成一次交换，
//! 再从客户端读取完整的响应字节。

use http_exchange::{Http, Request, Response, TcpConnection};

use std::{
    convert::Infallible,
    io::{Read, Write},
    net::{Shutdown, TcpListener, TcpStream},
    thread,
    time::Duration,
};

const READ_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

fn echo(request: &Request) -> Result<Response, Infallible> {
    let body = format!(
        "{} {} {}",
        request.method(),
        request.uri(),
        String::from_utf8_lossy(request.message_body())
    );
    Ok(Response::new(200, "OK", body))
}

/// 启动只处理一个连接的服务端，返回客户端收到的全部字节
fn exchange(raw_request: &[u8], half_close: bool) -> Vec<u8> {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(READ_WRITE_TIMEOUT)).unwrap();
        let mut connection = TcpConnection::new(stream);
        Http::new(echo).handle(&mut connection)
    });

    let mut client = TcpStream::connect(addr).unwrap();
    client.set_read_timeout(Some(READ_WRITE_TIMEOUT)).unwrap();
    client.write_all(raw_request).unwrap();
    if half_close {
        client.shutdown(Shutdown::Write).unwrap();
    }

    let mut response = Vec::new();
    client.read_to_end(&mut response).unwrap();
    server.join().unwrap().unwrap();
    response
}

#[test]
fn test_get_request_over_tcp() {
    let response = exchange(b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n", false);

    assert_eq!(
        String::from_utf8(response).unwrap(),
        "HTTP/1.1 200 OK\nContent-Length: 11\n\nGET /hello "
    );
}

#[test]
fn test_post_request_over_tcp() {
    let response = exchange(
        b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello",
        false,
    );

    assert_eq!(
        String::from_utf8(response).unwrap(),
        "HTTP/1.1 200 OK\nContent-Length: 16\n\nPOST /echo hello"
    );
}

/// 客户端只发送半个请求行就关闭写端：服务端不写响应，直接关闭连接
#[test]
fn test_incomplete_request_over_tcp_gets_no_response() {
    let response = exchange(b"GET", true);

    assert!(response.is_empty());
}

/// 请求行之后直接关闭写端也是一个完整的请求
#[test]
fn test_request_line_then_half_close() {
    let response = exchange(b"GET / HTTP/1.1\n", true);

    assert_eq!(
        String::from_utf8(response).unwrap(),
        "HTTP/1.1 200 OK\nContent-Length: 6\n\nGET / "
    );
}
