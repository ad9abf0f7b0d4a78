use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use super::PlatformCommand;
use crate::error::{MacChangerError, Result};

/// 外部命令执行器
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// 执行命令并等待其结束, 成功时返回标准输出
    async fn run(&self, command: &PlatformCommand) -> Result<String>;
}

/// 通过操作系统进程执行命令
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, command: &PlatformCommand) -> Result<String> {
        debug!("Executing: {}", command);

        let failed = |message: String| MacChangerError::CommandFailed {
            command: command.to_string(),
            message,
        };

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if !stderr.is_empty() {
            stderr
        } else if !stdout.is_empty() {
            stdout
        } else {
            output.status.to_string()
        };

        Err(failed(message))
    }
}
