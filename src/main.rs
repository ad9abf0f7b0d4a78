mod address;
mod cli;
mod error;
mod modules;
mod platform;
mod session;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{Args, Config};
use log::{error, info};
use modules::{mac_changer::ADDRESS_PARAM, MacChanger};
use platform::{PlatformCommandBuilder, SystemCommandRunner};
use session::{InterfaceContext, Module, Outcome, Session};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 加载配置, 命令行参数优先
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path))?,
        None => Config::default(),
    };
    config.apply_args(&args);

    // 初始化日志
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    let interface_name = config
        .interface
        .clone()
        .ok_or_else(|| anyhow!("no interface given, use --interface or the config file"))?;

    // 读取接口当前地址
    let interface = InterfaceContext::lookup(&interface_name)
        .with_context(|| format!("cannot read hardware address of {}", interface_name))?
        .into_shared();
    info!(
        "Using interface {} ({})",
        interface_name,
        interface.read().hw()
    );

    // 创建会话并注册模块
    let mut mac_changer = MacChanger::new(
        Arc::clone(&interface),
        Arc::new(SystemCommandRunner::new()),
        PlatformCommandBuilder::current(),
    );
    mac_changer
        .parameters_mut()
        .set(ADDRESS_PARAM, &config.mac_changer.address)
        .context("invalid mac_changer.address")?;

    let mut session = Session::new(interface);
    session.register(mac_changer);

    let mut quit = false;
    if let Some(script) = &args.eval {
        match session.eval(script).await {
            Ok(outcomes) => {
                for outcome in outcomes {
                    match outcome {
                        Outcome::Output(text) => println!("{}", text),
                        Outcome::Quit => quit = true,
                        Outcome::Done => {}
                    }
                }
            }
            Err(e) => error!("{}", e),
        }
    }

    if !quit {
        // Ctrl-C 与正常退出一样, 先恢复原地址
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        if let Err(e) = session
            .interact(BufReader::new(tokio::io::stdin()), &interface_name, shutdown)
            .await
        {
            error!("{}", e);
        }
    }

    // 退出前恢复所有模块
    session.close().await;

    // stdin 上挂起的阻塞读取会让运行时无法退出
    std::process::exit(0)
}
