use crate::error::{MacChangerError, Result};

/// 参数值校验函数
pub type Validator = fn(&str) -> Result<()>;

/// 模块参数
#[derive(Clone)]
pub struct Parameter {
    name: String,
    default: String,
    description: String,
    validator: Validator,
    value: Option<String>,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        default: impl Into<String>,
        description: impl Into<String>,
        validator: Validator,
    ) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            description: description.into(),
            validator,
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// 当前值, 未设置时返回默认值
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or(self.default.as_str())
    }

    pub fn set(&mut self, value: &str) -> Result<()> {
        let value = value.trim();
        (self.validator)(value)?;
        self.value = Some(value.to_string());
        Ok(())
    }
}

/// 模块的参数集合
#[derive(Clone, Default)]
pub struct Parameters {
    params: Vec<Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, param: Parameter) {
        self.params.retain(|p| p.name != param.name);
        self.params.push(param);
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn string(&self, name: &str) -> Result<String> {
        self.get(name)
            .map(|p| p.value().to_string())
            .ok_or_else(|| MacChangerError::UnknownParameter(name.to_string()))
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| MacChangerError::UnknownParameter(name.to_string()))?
            .set(value)
    }

    /// 跳过校验直接写入, 仅用于测试配置阶段的错误路径
    #[cfg(test)]
    pub(crate) fn set_unchecked(&mut self, name: &str, value: &str) {
        if let Some(param) = self.params.iter_mut().find(|p| p.name == name) {
            param.value = Some(value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressResolver;

    fn params() -> Parameters {
        let mut params = Parameters::new();
        params.add(Parameter::new(
            "mac.changer.address",
            "random",
            "Hardware address to apply to the interface.",
            AddressResolver::validate,
        ));
        params
    }

    #[test]
    fn test_default_value() {
        let params = params();
        assert_eq!(params.string("mac.changer.address").unwrap(), "random");
    }

    #[test]
    fn test_set_validates_address() {
        let mut params = params();
        params.set("mac.changer.address", " 11-22-33-44-55-66 ").unwrap();
        assert_eq!(params.string("mac.changer.address").unwrap(), "11-22-33-44-55-66");

        let err = params.set("mac.changer.address", "11:22:33").unwrap_err();
        assert!(matches!(err, MacChangerError::InvalidAddress(_)));
        assert_eq!(params.string("mac.changer.address").unwrap(), "11-22-33-44-55-66");

        params.set("mac.changer.address", "RANDOM").unwrap();
        assert_eq!(params.string("mac.changer.address").unwrap(), "RANDOM");
    }

    #[test]
    fn test_unknown_parameter() {
        let mut params = params();
        assert!(matches!(
            params.set("arp.spoof.targets", "x"),
            Err(MacChangerError::UnknownParameter(_))
        ));
        assert!(matches!(
            params.string("arp.spoof.targets"),
            Err(MacChangerError::UnknownParameter(_))
        ));
    }
}
