// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

use crate::{
    param::{DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_HEADER_SIZE},
    request::RequestParser,
};

use log::{error, warn};
use serde_derive::{Deserialize, Serialize};
use std::{fs, time::Duration};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    port: u16,
    local: bool,
    #[serde(default)]
    worker_threads: usize,
    #[serde(default = "default_read_timeout_secs")]
    read_timeout_secs: u64,
    #[serde(default = "default_write_timeout_secs")]
    write_timeout_secs: u64,
    #[serde(default = "default_max_header_size")]
    max_header_size: u64,
    #[serde(default = "default_max_body_size")]
    max_body_size: u64,
}

fn default_read_timeout_secs() -> u64 {
    30
}

fn default_write_timeout_secs() -> u64 {
    30
}

fn default_max_header_size() -> u64 {
    DEFAULT_MAX_HEADER_SIZE
}

fn default_max_body_size() -> u64 {
    DEFAULT_MAX_BODY_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            port: 7878,
            local: true,
            worker_threads: num_cpus::get(),
            read_timeout_secs: default_read_timeout_secs(),
            write_timeout_secs: default_write_timeout_secs(),
            max_header_size: default_max_header_size(),
            max_body_size: default_max_body_size(),
        }
    }

    /// 从 TOML 文件加载配置。文件不存在或内容非法时记录日志并使用默认配置。
    pub fn from_toml(filename: &str) -> Self {
        let str_val = match fs::read_to_string(filename) {
            Ok(s) => s,
            Err(e) => {
                error!("无法读取配置文件{}：{}，使用默认配置", filename, e);
                return Config::new();
            }
        };
        Self::from_toml_str(&str_val)
    }

    pub fn from_toml_str(str_val: &str) -> Self {
        let mut raw_config: Config = match toml::from_str(str_val) {
            Ok(t) => t,
            Err(e) => {
                error!("无法成功从配置文件构建配置对象：{}，使用默认配置", e);
                Config::new()
            }
        };
        if raw_config.worker_threads == 0 {
            raw_config.worker_threads = num_cpus::get();
        }
        if raw_config.max_header_size == 0 {
            warn!("max_header_size被设置为0，所有请求都会被拒绝。");
        }
        if raw_config.max_body_size == 0 {
            warn!("max_body_size被设置为0，这会拒绝所有带请求体的请求。");
        }
        raw_config
    }
}

impl Config {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn local(&self) -> bool {
        self.local
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// 读超时，0 表示不设超时
    pub fn read_timeout(&self) -> Option<Duration> {
        match self.read_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// 写超时，0 表示不设超时
    pub fn write_timeout(&self) -> Option<Duration> {
        match self.write_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn max_header_size(&self) -> u64 {
        self.max_header_size
    }

    pub fn max_body_size(&self) -> u64 {
        self.max_body_size
    }

    pub fn parser(&self) -> RequestParser {
        RequestParser::with_limits(self.max_header_size, self.max_body_size)
    }
}
