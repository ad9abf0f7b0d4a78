//! 会话模块实现

pub mod mac_changer;

pub use mac_changer::MacChanger;
