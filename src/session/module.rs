use async_trait::async_trait;

use super::param::Parameters;
use super::state::ModuleState;
use crate::error::Result;

/// 命令处理动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAction {
    Start,
    Stop,
}

/// 模块对外暴露的命令
#[derive(Debug, Clone)]
pub struct ModuleHandler {
    pub name: String,
    pub description: String,
    pub action: HandlerAction,
}

impl ModuleHandler {
    pub fn new(name: impl Into<String>, description: impl Into<String>, action: HandlerAction) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            action,
        }
    }
}

/// 会话模块
#[async_trait]
pub trait Module: Send + Sync {
    /// 获取模块名称
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn author(&self) -> &str;

    fn parameters(&self) -> &Parameters;

    fn parameters_mut(&mut self) -> &mut Parameters;

    fn handlers(&self) -> &[ModuleHandler];

    /// 获取当前状态
    fn state(&self) -> ModuleState;

    fn running(&self) -> bool {
        self.state() == ModuleState::Running
    }

    /// 读取参数并准备启动
    fn configure(&mut self) -> Result<()>;

    /// 启动模块
    async fn start(&mut self) -> Result<()>;

    /// 停止模块
    async fn stop(&mut self) -> Result<()>;

    /// 执行命令对应的动作
    async fn handle(&mut self, action: HandlerAction) -> Result<()> {
        match action {
            HandlerAction::Start => self.start().await,
            HandlerAction::Stop => self.stop().await,
        }
    }
}
