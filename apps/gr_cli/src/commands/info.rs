// apps/gr_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示构建信息、参考配置与 Kerr 预设。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use gr_config::SimulationConfig;
use gr_foundation::constants::defaults;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示系统信息
    #[arg(long)]
    pub system: bool,

    /// 显示参考配置
    #[arg(long)]
    pub defaults: bool,

    /// 显示修正 Kerr-Schild 预设 (64×64×1)
    #[arg(long)]
    pub kerr: bool,

    /// 将所选配置写入文件，可作为 `run --config` 的模板
    #[arg(short, long)]
    pub write: Option<PathBuf>,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== GR 磁流体信息 ===");

    if args.system {
        print_system_info();
    }

    let config = if args.kerr {
        kerr_preset()
    } else {
        SimulationConfig::default()
    };

    if args.defaults || args.kerr {
        print_config(&config)?;
    }

    if !args.system && !args.defaults && !args.kerr {
        print_system_info();
        println!();
        print_config(&config)?;
    }

    if let Some(path) = &args.write {
        config
            .save_to_file(path)
            .with_context(|| format!("无法写入配置 {}", path.display()))?;
        println!("\n配置已写入 {}", path.display());
    }

    Ok(())
}

fn kerr_preset() -> SimulationConfig {
    SimulationConfig::modified_kerr_schild(
        64,
        64,
        1,
        defaults::BLACK_HOLE_SPIN,
        defaults::H_SLOPE,
    )
}

fn print_system_info() {
    println!("=== 系统信息 ===");
    println!("gr_cli 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);
    println!("并行线程: {}", available_threads());
}

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn print_config(config: &SimulationConfig) -> Result<()> {
    println!("=== 配置 ===");
    println!("时空: {}", config.spacetime.kind);
    println!(
        "网格: {} × {} × {}, 维数 {}, ghost {}",
        config.grid.n1, config.grid.n2, config.grid.n3, config.grid.dim, config.grid.num_ghost
    );
    println!(
        "时间: t = {} → {}, dt = {} ({} 步)",
        config.time.start_time,
        config.time.final_time,
        config.time.dt,
        config.num_steps()
    );
    println!("限制器: {:?}", config.scheme.limiter);
    println!("\n{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
