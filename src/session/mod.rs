//! 会话模块
//!
//! 该模块提供了模块注册、参数存取、命令分发以及共享接口上下文。

pub mod interface;
pub mod module;
pub mod param;
pub mod state;

pub use interface::{InterfaceContext, SharedInterface};
pub use module::{HandlerAction, Module, ModuleHandler};
pub use param::{Parameter, Parameters};
pub use state::ModuleState;

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;

use crate::error::{MacChangerError, Result};

/// 会话命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Help,
    Quit,
    Get { name: String },
    Set { name: String, value: String },
    /// 模块命令, 如 `mac.changer on`
    Module(String),
}

impl SessionCommand {
    /// 解析一行输入, 空行返回 `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return Ok(None);
        };

        let command = match first.to_lowercase().as_str() {
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            "get" if parts.len() == 2 => SessionCommand::Get {
                name: parts[1].to_string(),
            },
            "set" if parts.len() >= 3 => SessionCommand::Set {
                name: parts[1].to_string(),
                value: parts[2..].join(" "),
            },
            "get" | "set" => {
                return Err(MacChangerError::UnknownCommand(line.trim().to_string()));
            }
            _ => SessionCommand::Module(parts.join(" ")),
        };

        Ok(Some(command))
    }
}

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Output(String),
    Quit,
}

/// 交互会话
pub struct Session {
    interface: SharedInterface,
    modules: Vec<Arc<Mutex<dyn Module>>>,
}

impl Session {
    pub fn new(interface: SharedInterface) -> Self {
        Self {
            interface,
            modules: Vec::new(),
        }
    }

    pub fn interface(&self) -> &SharedInterface {
        &self.interface
    }

    /// 注册模块, 每个模块由一把互斥锁保护, 同一时刻只有一个启动/停止调用
    pub fn register<M: Module + 'static>(&mut self, module: M) {
        debug!("Registering module {}", module.name());
        self.modules.push(Arc::new(Mutex::new(module)));
    }

    pub fn modules(&self) -> &[Arc<Mutex<dyn Module>>] {
        &self.modules
    }

    /// 执行一行命令
    pub async fn run(&self, line: &str) -> Result<Outcome> {
        let Some(command) = SessionCommand::parse(line)? else {
            return Ok(Outcome::Done);
        };

        match command {
            SessionCommand::Help => Ok(Outcome::Output(self.help().await)),
            SessionCommand::Quit => Ok(Outcome::Quit),
            SessionCommand::Get { name } => {
                for module in &self.modules {
                    let module = module.lock().await;
                    if let Some(param) = module.parameters().get(&name) {
                        return Ok(Outcome::Output(format!("{}: '{}'", name, param.value())));
                    }
                }
                Err(MacChangerError::UnknownParameter(name))
            }
            SessionCommand::Set { name, value } => {
                for module in &self.modules {
                    let mut module = module.lock().await;
                    if module.parameters().contains(&name) {
                        module.parameters_mut().set(&name, &value)?;
                        return Ok(Outcome::Output(format!("{} => '{}'", name, value)));
                    }
                }
                Err(MacChangerError::UnknownParameter(name))
            }
            SessionCommand::Module(verb) => {
                for module in &self.modules {
                    let mut module = module.lock().await;
                    let action = module
                        .handlers()
                        .iter()
                        .find(|h| h.name == verb)
                        .map(|h| h.action);
                    if let Some(action) = action {
                        module.handle(action).await?;
                        return Ok(Outcome::Done);
                    }
                }
                Err(MacChangerError::UnknownCommand(verb))
            }
        }
    }

    /// 依次执行以 `;` 分隔的命令, 遇到错误或退出命令时停止
    pub async fn eval(&self, script: &str) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::new();
        for line in script.split(';').map(str::trim).filter(|l| !l.is_empty()) {
            let outcome = self.run(line).await?;
            let quit = outcome == Outcome::Quit;
            outcomes.push(outcome);
            if quit {
                break;
            }
        }
        Ok(outcomes)
    }

    pub async fn help(&self) -> String {
        let mut out = String::from(
            "help : List available commands.\n\
             get NAME : Get the value of a module parameter.\n\
             set NAME VALUE : Set the value of a module parameter.\n\
             quit : Close the session and exit.\n",
        );

        for module in &self.modules {
            let module = module.lock().await;
            out.push_str(&format!(
                "\n{} ({}): {}\n  author: {}\n",
                module.name(),
                module.state(),
                module.description(),
                module.author()
            ));
            for handler in module.handlers() {
                out.push_str(&format!("  {} : {}\n", handler.name, handler.description));
            }
            for param in module.parameters().iter() {
                out.push_str(&format!(
                    "  {} : {} (default={}, value={})\n",
                    param.name(),
                    param.description(),
                    param.default_value(),
                    param.value()
                ));
            }
        }

        out
    }

    /// 交互循环: 逐行读取命令, 遇到退出命令、输入结束或 `shutdown` 完成时返回
    pub async fn interact<R, F>(&self, reader: R, prompt: &str, shutdown: F) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        F: Future<Output = ()>,
    {
        let mut lines = reader.lines();
        tokio::pin!(shutdown);

        loop {
            print!("{} > ", prompt);
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = &mut shutdown => {
                    println!();
                    info!("Interrupted, closing session");
                    return Ok(());
                }
            };

            let Some(line) = line else {
                return Ok(());
            };

            match self.run(&line).await {
                Ok(Outcome::Output(text)) => println!("{}", text),
                Ok(Outcome::Quit) => return Ok(()),
                Ok(Outcome::Done) => {}
                Err(e) => error!("{}", e),
            }
        }
    }

    /// 停止所有仍在运行的模块
    pub async fn close(&self) {
        for module in &self.modules {
            let mut module = module.lock().await;
            if module.running() {
                info!("Stopping module {}", module.name());
                if let Err(e) = module.stop().await {
                    error!("Failed to stop module {}: {}", module.name(), e);
                }
            }
        }
    }
}
