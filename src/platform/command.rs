use std::fmt;

use crate::address::HardwareAddress;
use crate::error::{MacChangerError, Result};

/// 网络接口配置工具
pub const IFCONFIG: &str = "ifconfig";

/// 支持的平台
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// BSD 系列以及 darwin
    Bsd,
    Linux,
}

impl Platform {
    pub fn from_os(os: &str) -> Result<Self> {
        if os.contains("bsd") || os == "darwin" {
            Ok(Platform::Bsd)
        } else if os == "linux" {
            Ok(Platform::Linux)
        } else {
            Err(MacChangerError::UnsupportedPlatform(os.to_string()))
        }
    }
}

/// 待执行的外部命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for PlatformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// 命令构造器
///
/// 操作系统标识在构造时注入, 构造出的命令只是数据, 不会被执行。
#[derive(Debug, Clone)]
pub struct PlatformCommandBuilder {
    os: String,
}

impl PlatformCommandBuilder {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }

    /// 使用当前编译目标的操作系统标识
    pub fn current() -> Self {
        Self::new(std::env::consts::OS)
    }

    pub fn build(&self, interface_name: &str, target: &HardwareAddress) -> Result<PlatformCommand> {
        let mac = target.to_string();
        let args = match Platform::from_os(&self.os)? {
            Platform::Bsd => vec![interface_name.to_string(), "ether".to_string(), mac],
            Platform::Linux => vec![
                interface_name.to_string(),
                "hw".to_string(),
                "ether".to_string(),
                mac,
            ],
        };

        Ok(PlatformCommand {
            program: IFCONFIG.to_string(),
            args,
        })
    }
}
