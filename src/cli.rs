use serde::Deserialize;
use clap::Parser;
use std::fs;
use crate::address::RANDOM_SENTINEL;
use crate::error::Result;

#[derive(Parser, Debug, Deserialize)]
#[command(author, version, about)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<String>,

    /// 要修改的网络接口名称
    #[arg(short, long)]
    pub interface: Option<String>,

    /// 要设置的硬件地址, 或 random
    #[arg(short, long)]
    pub address: Option<String>,

    /// 启动后执行的命令, 以 ; 分隔
    #[arg(short, long)]
    pub eval: Option<String>,

    /// 日志级别
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// 要修改的网络接口名称
    #[serde(default)]
    pub interface: Option<String>,

    #[serde(default)]
    pub mac_changer: MacChangerConfig,

    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// 默认日志级别
fn default_log_level() -> String {
    "info".to_string()
}

fn default_address() -> String {
    RANDOM_SENTINEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: None,
            mac_changer: MacChangerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// 从 YAML 文件加载配置
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// 命令行参数覆盖配置文件
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(interface) = &args.interface {
            self.interface = Some(interface.clone());
        }
        if let Some(address) = &args.address {
            self.mac_changer.address = address.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MacChangerConfig {
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for MacChangerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}
