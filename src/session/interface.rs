use std::sync::Arc;

use parking_lot::RwLock;
use pnet::datalink;
use pnet::util::MacAddr;

use crate::address::HardwareAddress;
use crate::error::{MacChangerError, Result};

/// 会话内共享的接口上下文
pub type SharedInterface = Arc<RwLock<InterfaceContext>>;

/// 当前活动接口的名称与硬件地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceContext {
    name: String,
    hw: HardwareAddress,
}

impl InterfaceContext {
    pub fn new(name: impl Into<String>, hw: HardwareAddress) -> Self {
        Self {
            name: name.into(),
            hw,
        }
    }

    /// 从系统中读取指定接口当前的硬件地址
    pub fn lookup(name: &str) -> Result<Self> {
        let interface = datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| MacChangerError::Interface(format!("Interface {} not found", name)))?;

        let mac = interface.mac.ok_or_else(|| {
            MacChangerError::Interface(format!("Interface {} has no hardware address", name))
        })?;

        Ok(Self::new(name, HardwareAddress::from(mac)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hw(&self) -> HardwareAddress {
        self.hw
    }

    pub fn set_hw(&mut self, hw: HardwareAddress) {
        self.hw = hw;
    }

    pub fn into_shared(self) -> SharedInterface {
        Arc::new(RwLock::new(self))
    }
}

impl From<MacAddr> for HardwareAddress {
    fn from(mac: MacAddr) -> Self {
        let MacAddr(a, b, c, d, e, f) = mac;
        HardwareAddress::new([a, b, c, d, e, f])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pnet_mac() {
        let hw = HardwareAddress::from(MacAddr(0x00, 0x1b, 0x21, 0x3c, 0x4d, 0x5e));
        assert_eq!(hw.to_string(), "00:1b:21:3c:4d:5e");
    }

    #[test]
    fn test_shared_context_update() {
        let original: HardwareAddress = "00:1b:21:3c:4d:5e".parse().unwrap();
        let shared = InterfaceContext::new("eth0", original).into_shared();
        let other = Arc::clone(&shared);

        let fake: HardwareAddress = "02:00:00:00:00:01".parse().unwrap();
        shared.write().set_hw(fake);

        assert_eq!(other.read().hw(), fake);
        assert_eq!(other.read().name(), "eth0");
    }

    #[test]
    fn test_lookup_missing_interface() {
        let err = InterfaceContext::lookup("no-such-interface-0").unwrap_err();
        assert!(matches!(err, MacChangerError::Interface(_)));
    }
}
