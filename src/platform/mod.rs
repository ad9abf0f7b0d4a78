//! 平台相关模块
//!
//! 根据操作系统构造修改硬件地址所需的命令, 并负责执行外部命令。

pub mod command;
pub mod runner;

pub use command::{Platform, PlatformCommand, PlatformCommandBuilder};
pub use runner::{CommandRunner, SystemCommandRunner};
