use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::address::{AddressResolver, HardwareAddress, RANDOM_SENTINEL};
use crate::error::{MacChangerError, Result};
use crate::platform::{CommandRunner, PlatformCommandBuilder};
use crate::session::{
    HandlerAction, Module, ModuleHandler, ModuleState, Parameter, Parameters, SharedInterface,
};

pub const NAME: &str = "mac.changer";
pub const ADDRESS_PARAM: &str = "mac.changer.address";

/// 修改活动接口的硬件地址, 停止时恢复原地址
pub struct MacChanger {
    parameters: Parameters,
    handlers: Vec<ModuleHandler>,
    state: ModuleState,
    interface: SharedInterface,
    runner: Arc<dyn CommandRunner>,
    builder: PlatformCommandBuilder,
    original_mac: Option<HardwareAddress>,
    fake_mac: Option<HardwareAddress>,
}

impl MacChanger {
    pub fn new(
        interface: SharedInterface,
        runner: Arc<dyn CommandRunner>,
        builder: PlatformCommandBuilder,
    ) -> Self {
        let mut parameters = Parameters::new();
        parameters.add(Parameter::new(
            ADDRESS_PARAM,
            RANDOM_SENTINEL,
            "Hardware address to apply to the interface.",
            AddressResolver::validate,
        ));

        let handlers = vec![
            ModuleHandler::new(
                format!("{} on", NAME),
                "Start mac changer module.",
                HandlerAction::Start,
            ),
            ModuleHandler::new(
                format!("{} off", NAME),
                "Stop mac changer module and restore original mac address.",
                HandlerAction::Stop,
            ),
        ];

        Self {
            parameters,
            handlers,
            state: ModuleState::Stopped,
            interface,
            runner,
            builder,
            original_mac: None,
            fake_mac: None,
        }
    }

    pub fn original_mac(&self) -> Option<HardwareAddress> {
        self.original_mac
    }

    pub fn fake_mac(&self) -> Option<HardwareAddress> {
        self.fake_mac
    }

    /// 解析目标地址并记录当前地址, 失败时不修改任何字段
    fn prepare(&mut self) -> Result<HardwareAddress> {
        let change_to = self.parameters.string(ADDRESS_PARAM)?;
        let fake_mac = AddressResolver::resolve(&change_to)?;
        let original_mac = self.interface.read().hw();

        self.fake_mac = Some(fake_mac);
        self.original_mac = Some(original_mac);
        Ok(fake_mac)
    }

    /// 执行地址修改命令, 成功后才写回接口上下文
    async fn set_mac(&self, mac: HardwareAddress) -> Result<()> {
        let interface_name = self.interface.read().name().to_string();
        let command = self.builder.build(&interface_name, &mac)?;

        debug!("{}: applying {} to {}", NAME, mac, interface_name);
        self.runner.run(&command).await?;

        self.interface.write().set_hw(mac);
        Ok(())
    }
}

#[async_trait]
impl Module for MacChanger {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Change active interface mac address."
    }

    fn author(&self) -> &str {
        "Simone Margaritelli <evilsocket@protonmail.com>"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn handlers(&self) -> &[ModuleHandler] {
        &self.handlers
    }

    fn state(&self) -> ModuleState {
        self.state
    }

    fn configure(&mut self) -> Result<()> {
        self.prepare().map(|_| ())
    }

    async fn start(&mut self) -> Result<()> {
        if self.running() {
            return Err(MacChangerError::AlreadyStarted(NAME.to_string()));
        }

        let fake_mac = self.prepare()?;
        self.set_mac(fake_mac).await?;

        self.state = ModuleState::Running;
        info!("Interface mac address set to {}", fake_mac);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.running() {
            return Err(MacChangerError::AlreadyStopped(NAME.to_string()));
        }

        let original_mac = self.original_mac.ok_or_else(|| {
            MacChangerError::Interface("no original hardware address recorded".to_string())
        })?;
        self.set_mac(original_mac).await?;

        self.state = ModuleState::Stopped;
        self.original_mac = None;
        info!("Interface mac address restored to {}", original_mac);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::runner::MockCommandRunner;
    use crate::session::InterfaceContext;
    use tokio_test::{assert_err, assert_ok};

    const ORIGINAL: &str = "00:1b:21:3c:4d:5e";
    const FAKE: &str = "11:22:33:44:55:66";

    fn mac(s: &str) -> HardwareAddress {
        s.parse().unwrap()
    }

    fn changer(runner: MockCommandRunner, os: &str) -> (MacChanger, SharedInterface) {
        let interface = InterfaceContext::new("eth0", mac(ORIGINAL)).into_shared();
        let changer = MacChanger::new(
            Arc::clone(&interface),
            Arc::new(runner),
            PlatformCommandBuilder::new(os),
        );
        (changer, interface)
    }

    fn failed() -> MacChangerError {
        MacChangerError::CommandFailed {
            command: "ifconfig".to_string(),
            message: "SIOCSIFHWADDR: Operation not permitted".to_string(),
        }
    }

    #[test]
    fn test_module_metadata() {
        let (changer, _) = changer(MockCommandRunner::new(), "linux");
        assert_eq!(changer.name(), "mac.changer");
        assert_eq!(changer.description(), "Change active interface mac address.");
        assert_eq!(changer.author(), "Simone Margaritelli <evilsocket@protonmail.com>");
        assert_eq!(changer.state(), ModuleState::Stopped);
        let names: Vec<&str> = changer.handlers().iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["mac.changer on", "mac.changer off"]);
        assert_eq!(changer.parameters().string(ADDRESS_PARAM).unwrap(), "random");
    }

    #[test]
    fn test_configure_snapshots_addresses() {
        let (mut changer, interface) = changer(MockCommandRunner::new(), "linux");
        changer.parameters_mut().set(ADDRESS_PARAM, "11-22-33-44-55-66").unwrap();

        assert_ok!(changer.configure());
        assert_eq!(changer.fake_mac(), Some(mac(FAKE)));
        assert_eq!(changer.original_mac(), Some(mac(ORIGINAL)));
        assert_eq!(interface.read().hw(), mac(ORIGINAL));
        assert_eq!(changer.state(), ModuleState::Stopped);
    }

    #[tokio::test]
    async fn test_invalid_address_leaves_module_untouched() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let (mut changer, interface) = changer(runner, "linux");
        changer.parameters_mut().set(ADDRESS_PARAM, FAKE).unwrap();
        assert_ok!(changer.configure());

        interface.write().set_hw(mac("02:00:00:00:00:01"));
        changer.parameters_mut().set_unchecked(ADDRESS_PARAM, "11:22:33");

        let err = assert_err!(changer.configure());
        assert!(matches!(err, MacChangerError::InvalidAddress(_)));
        assert_eq!(changer.fake_mac(), Some(mac(FAKE)));
        assert_eq!(changer.original_mac(), Some(mac(ORIGINAL)));
        assert_eq!(changer.state(), ModuleState::Stopped);

        let err = assert_err!(changer.start().await);
        assert!(matches!(err, MacChangerError::InvalidAddress(_)));
        assert_eq!(changer.state(), ModuleState::Stopped);
        assert_eq!(interface.read().hw(), mac("02:00:00:00:00:01"));
    }

    #[tokio::test]
    async fn test_start_then_stop_restores() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.program == "ifconfig" && cmd.args == ["eth0", "hw", "ether", FAKE])
            .times(1)
            .returning(|_| Ok(String::new()));
        runner
            .expect_run()
            .withf(|cmd| cmd.program == "ifconfig" && cmd.args == ["eth0", "hw", "ether", ORIGINAL])
            .times(1)
            .returning(|_| Ok(String::new()));

        let (mut changer, interface) = changer(runner, "linux");
        changer.parameters_mut().set(ADDRESS_PARAM, FAKE).unwrap();

        assert_ok!(changer.start().await);
        assert_eq!(changer.state(), ModuleState::Running);
        assert_eq!(interface.read().hw(), mac(FAKE));

        assert_ok!(changer.stop().await);
        assert_eq!(changer.state(), ModuleState::Stopped);
        assert_eq!(interface.read().hw(), mac(ORIGINAL));
        assert_eq!(changer.original_mac(), None);
    }

    #[tokio::test]
    async fn test_bsd_ordering() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.args == ["eth0", "ether", FAKE])
            .times(1)
            .returning(|_| Ok(String::new()));

        let (mut changer, _) = changer(runner, "darwin");
        changer.parameters_mut().set(ADDRESS_PARAM, FAKE).unwrap();
        assert_ok!(changer.start().await);
    }

    #[tokio::test]
    async fn test_start_twice_rejected() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|_| Ok(String::new()));

        let (mut changer, interface) = changer(runner, "linux");
        changer.parameters_mut().set(ADDRESS_PARAM, FAKE).unwrap();
        assert_ok!(changer.start().await);

        changer.parameters_mut().set(ADDRESS_PARAM, "aa:bb:cc:dd:ee:ff").unwrap();
        let err = assert_err!(changer.start().await);
        assert!(matches!(err, MacChangerError::AlreadyStarted(_)));
        assert_eq!(interface.read().hw(), mac(FAKE));
        assert_eq!(changer.original_mac(), Some(mac(ORIGINAL)));
        assert_eq!(changer.state(), ModuleState::Running);
    }

    #[tokio::test]
    async fn test_stop_when_stopped_does_not_run_command() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let (mut changer, interface) = changer(runner, "linux");
        let err = assert_err!(changer.stop().await);
        assert!(matches!(err, MacChangerError::AlreadyStopped(_)));
        assert_eq!(interface.read().hw(), mac(ORIGINAL));
    }

    #[tokio::test]
    async fn test_start_command_failure_keeps_state() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|_| Err(failed()));

        let (mut changer, interface) = changer(runner, "linux");
        changer.parameters_mut().set(ADDRESS_PARAM, FAKE).unwrap();

        match changer.start().await {
            Err(MacChangerError::CommandFailed { message, .. }) => {
                assert_eq!(message, "SIOCSIFHWADDR: Operation not permitted")
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
        assert_eq!(changer.state(), ModuleState::Stopped);
        assert_eq!(interface.read().hw(), mac(ORIGINAL));
    }

    #[tokio::test]
    async fn test_stop_command_failure_keeps_running() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.args.last().map(String::as_str) == Some(FAKE))
            .times(1)
            .returning(|_| Ok(String::new()));
        runner
            .expect_run()
            .withf(|cmd| cmd.args.last().map(String::as_str) == Some(ORIGINAL))
            .times(1)
            .returning(|_| Err(failed()));

        let (mut changer, interface) = changer(runner, "linux");
        changer.parameters_mut().set(ADDRESS_PARAM, FAKE).unwrap();
        assert_ok!(changer.start().await);

        let err = assert_err!(changer.stop().await);
        assert!(matches!(err, MacChangerError::CommandFailed { .. }));
        assert_eq!(changer.state(), ModuleState::Running);
        assert_eq!(interface.read().hw(), mac(FAKE));
        assert_eq!(changer.original_mac(), Some(mac(ORIGINAL)));
    }

    #[tokio::test]
    async fn test_unsupported_platform_never_runs_command() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let (mut changer, interface) = changer(runner, "plan9");
        let err = assert_err!(changer.start().await);
        assert!(matches!(err, MacChangerError::UnsupportedPlatform(_)));
        assert_eq!(changer.state(), ModuleState::Stopped);
        assert_eq!(interface.read().hw(), mac(ORIGINAL));
    }

    #[tokio::test]
    async fn test_random_address_applied() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|_| Ok(String::new()));

        let (mut changer, interface) = changer(runner, "linux");
        assert_ok!(changer.start().await);

        let applied = interface.read().hw();
        assert_eq!(Some(applied), changer.fake_mac());
        assert!(applied.is_locally_administered());
        assert!(!applied.is_multicast());
    }
}
