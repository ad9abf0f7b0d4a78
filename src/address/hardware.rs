use std::fmt;
use std::str::FromStr;

use crate::error::{MacChangerError, Result};

/// 六字节链路层地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HardwareAddress([u8; 6]);

impl HardwareAddress {
    /// 多播位(首字节最低位)
    pub const MULTICAST_BIT: u8 = 0x01;
    /// 本地管理位(首字节次低位)
    pub const LOCAL_BIT: u8 = 0x02;

    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_multicast(&self) -> bool {
        self.0[0] & Self::MULTICAST_BIT != 0
    }

    pub fn is_locally_administered(&self) -> bool {
        self.0[0] & Self::LOCAL_BIT != 0
    }

    /// 拆分地址字符串, 分隔符只能是 `:` 或 `-` 中的一种, 或者没有分隔符
    fn split_octets(s: &str) -> Option<Vec<&str>> {
        match (s.contains(':'), s.contains('-')) {
            (true, false) => Some(s.split(':').collect()),
            (false, true) => Some(s.split('-').collect()),
            (false, false) if s.len() == 12 && s.is_ascii() => {
                Some((0..6).map(|i| &s[i * 2..i * 2 + 2]).collect())
            }
            _ => None,
        }
    }
}

impl From<[u8; 6]> for HardwareAddress {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for HardwareAddress {
    type Err = MacChangerError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MacChangerError::InvalidAddress(s.to_string());

        let parts = Self::split_octets(s.trim()).ok_or_else(invalid)?;
        if parts.len() != 6 {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (octet, part) in octets.iter_mut().zip(&parts) {
            if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }

        Ok(Self(octets))
    }
}
