// apps/gr_cli/src/main.rs

//! GR 磁流体命令行界面
//!
//! 在固定时空背景上运行约束输运推进，并提供配置检查与信息查询。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**，只通过 `SimulationConfig` 与
//! `SimulationBuilder` 接触核心库。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// GR 磁流体约束输运求解器命令行工具
#[derive(Parser)]
#[command(name = "gr_cli")]
#[command(author = "MariHydro Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "GRMHD constrained-transport solver on a fixed spacetime", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行磁场环输运
    Run(commands::run::RunArgs),
    /// 显示信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
