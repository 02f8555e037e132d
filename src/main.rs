// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 演示服务器
//!
//! 负责 `http_exchange` 核心之外的全部工作：
//! - 通过 log4rs 初始化日志
//! - 从 TOML 文件载入配置
//! - 在 Tokio 运行时上接收 TCP 连接
//! - 把每个连接转换为阻塞式 `TcpStream`，交给 `Http::handle` 在阻塞线程池中完成一次交换

use http_exchange::{Config, Http, Request, RequestHandler, Response, TcpConnection};

use log::{debug, error, info, warn, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config as LogConfig, Root},
    encode::pattern::PatternEncoder,
};
use tokio::{net::TcpListener, runtime::Builder};

use std::{
    convert::Infallible,
    io,
    net::{Ipv4Addr, SocketAddrV4},
    process,
    sync::Arc,
};

const LOG_CONFIG: &str = "config/log4rs.yaml";
const SERVER_CONFIG: &str = "config/development.toml";
const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

/// 内置的演示处理器
struct DemoHandler;

impl RequestHandler for DemoHandler {
    type Error = Infallible;

    fn handle(&self, request: &Request) -> Result<Response, Infallible> {
        let response = match (request.method(), request.uri()) {
            ("GET", "/") => Response::new(200, "OK", "Hello client!"),
            ("POST", "/echo") => Response::from_status_code(200, request.message_body().clone()),
            _ => Response::from_status_code(404, "Not Found"),
        };
        Ok(response)
    }
}

fn main() {
    // 1. 初始化日志系统，配置文件缺失时退回到控制台输出
    init_logger();

    // 2. 环境配置加载
    let config = Config::from_toml(SERVER_CONFIG);
    info!("配置文件已载入");

    // 3. 根据配置分配工作线程数
    let runtime = match Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("无法创建Tokio运行时：{}", e);
            process::exit(1);
        }
    };

    let http = Arc::new(Http::with_parser(DemoHandler, config.parser()));
    if let Err(e) = runtime.block_on(serve(config, http)) {
        error!("服务端异常退出：{}", e);
        process::exit(1);
    }
}

fn init_logger() {
    let file_error = match log4rs::init_file(LOG_CONFIG, Default::default()) {
        Ok(()) => return,
        Err(e) => e,
    };

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));
    match config.map(log4rs::init_config) {
        Ok(Ok(_)) => warn!(
            "无法从{}载入日志配置：{}，使用控制台日志",
            LOG_CONFIG, file_error
        ),
        Ok(Err(e)) => eprintln!("无法初始化日志系统：{}", e),
        Err(e) => eprintln!("无法构建日志配置：{}", e),
    }
}

/// # 接入循环
///
/// 持续接收新连接，并为每个连接派发一个阻塞任务。
async fn serve<H>(config: Config, http: Arc<Http<H>>) -> io::Result<()>
where
    H: RequestHandler<Error = Infallible> + Send + Sync + 'static,
{
    let address = match config.local() {
        true => Ipv4Addr::new(127, 0, 0, 1),
        false => Ipv4Addr::new(0, 0, 0, 0),
    };
    let socket = SocketAddrV4::new(address, config.port());
    let listener = TcpListener::bind(socket).await?;
    info!("服务端在{}上监听Socket连接", socket);

    let mut id: u128 = 0;
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("接收连接失败：{}", e);
                continue;
            }
        };
        debug!("[ID{}]新的连接：{}", id, addr);

        // 核心是阻塞式的，转换为标准库的 TcpStream 并设置传输层超时
        let stream = match stream.into_std().and_then(|s| {
            s.set_nonblocking(false)?;
            s.set_read_timeout(config.read_timeout())?;
            s.set_write_timeout(config.write_timeout())?;
            Ok(s)
        }) {
            Ok(s) => s,
            Err(e) => {
                error!("[ID{}]无法准备TCP连接：{}", id, e);
                id += 1;
                continue;
            }
        };

        let http = Arc::clone(&http);
        tokio::task::spawn_blocking(move || {
            let mut connection = TcpConnection::new(stream);
            match http.handle(&mut connection) {
                Ok(()) => debug!("[ID{}]交换结束", id),
                Err(e) => match e {},
            }
        });
        id += 1;
    }
}
