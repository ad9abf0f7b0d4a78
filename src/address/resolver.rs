use rand::Rng;

use super::HardwareAddress;
use crate::error::Result;

/// 表示"随机生成地址"的参数值
pub const RANDOM_SENTINEL: &str = "random";

/// 地址解析器
///
/// 将配置中的地址字符串解析为硬件地址, 遇到 [`RANDOM_SENTINEL`] 时生成随机地址。
pub struct AddressResolver;

impl AddressResolver {
    pub fn is_random(value: &str) -> bool {
        value.trim().eq_ignore_ascii_case(RANDOM_SENTINEL)
    }

    /// 校验参数值: 随机标记或合法地址
    pub fn validate(value: &str) -> Result<()> {
        if Self::is_random(value) {
            Ok(())
        } else {
            value.parse::<HardwareAddress>().map(|_| ())
        }
    }

    /// 使用线程随机数生成器解析
    pub fn resolve(value: &str) -> Result<HardwareAddress> {
        Self::resolve_with(value, &mut rand::thread_rng())
    }

    /// 使用指定的随机源解析
    pub fn resolve_with<R: Rng + ?Sized>(value: &str, rng: &mut R) -> Result<HardwareAddress> {
        if Self::is_random(value) {
            Ok(Self::random(rng))
        } else {
            value.parse()
        }
    }

    /// 生成单播、本地管理的随机地址
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> HardwareAddress {
        let mut octets = [0u8; 6];
        rng.fill(&mut octets);
        octets[0] = (octets[0] & !HardwareAddress::MULTICAST_BIT) | HardwareAddress::LOCAL_BIT;
        HardwareAddress::new(octets)
    }
}
