use std::fmt;

/// 模块运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleState {
    #[default]
    Stopped,
    Running,
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleState::Stopped => write!(f, "stopped"),
            ModuleState::Running => write!(f, "running"),
        }
    }
}
