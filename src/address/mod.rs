//! 硬件地址模块
//!
//! 该模块提供了链路层地址的解析、格式化以及随机地址生成。

pub mod hardware;
pub mod resolver;

pub use hardware::HardwareAddress;
pub use resolver::{AddressResolver, RANDOM_SENTINEL};
