// apps/gr_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 解析并校验配置，随后构建网格与几何，确认度规在每个区块上可用。

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use gr_config::{SimulationConfig, SpacetimeKind};
use gr_physics::SimulationBuilder;
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== 配置验证: {} ===", args.config.display());

    let mut result = ValidationResult::default();
    match SimulationConfig::from_file(&args.config) {
        Ok(config) => validate_config(config, &mut result),
        Err(e) => result.add_error(e.to_string()),
    }

    print_validation_result(&result, args.strict)
}

fn validate_config(config: SimulationConfig, result: &mut ValidationResult) {
    check_time_step(&config, result);

    let builder = match SimulationBuilder::from_config(config) {
        Ok(b) => b,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };
    match builder.build_geometry() {
        Ok(geometry) => {
            println!("  ✓ 几何构建成功: {} 区块", geometry.grid().interior().len());
            if geometry.kind() == SpacetimeKind::ModifiedKerrSchild {
                println!("  ✓ 视界半径 r₊ = {:.6}", geometry.horizon_radius());
            }
        }
        Err(e) => result.add_error(format!("几何构建失败: {}", e)),
    }
}

/// 步长相对最小网格间距的粗略检查（光速为 1）
fn check_time_step(config: &SimulationConfig, result: &mut ValidationResult) {
    let n = config.grid.n();
    let start = config.grid.start();
    let end = config.grid.end();
    let min_dx = (0..config.grid.dim)
        .map(|a| (end[a] - start[a]) / n[a] as f64)
        .fold(f64::INFINITY, f64::min);
    if min_dx.is_finite() && config.time.dt > 0.5 * min_dx {
        result.add_warning(format!(
            "dt = {} 大于最小网格间距 {:.4e} 的一半，推进可能不稳定",
            config.time.dt, min_dx
        ));
    }

    let steps = (config.time.final_time - config.time.start_time) / config.time.dt;
    if (steps - steps.round()).abs() > 1e-6 {
        result.add_warning(format!("模拟时长不是 dt 的整数倍 ({:.3} 步)", steps));
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_config_passes() {
        let mut result = ValidationResult::default();
        validate_config(SimulationConfig::default(), &mut result);
        assert!(result.is_ok_strict(), "{:?}", result.warnings);
    }

    #[test]
    fn test_large_dt_warns() {
        let mut config = SimulationConfig::default();
        config.time.dt = 0.1;
        config.time.final_time = 1.0;
        let mut result = ValidationResult::default();
        validate_config(config, &mut result);
        assert!(result.is_ok());
        assert!(!result.is_ok_strict());
    }

    #[test]
    fn test_missing_file_fails() {
        let args = ValidateArgs {
            config: PathBuf::from("/nonexistent/gr_cli_config.json"),
            strict: false,
        };
        assert!(execute(args).is_err());
    }
}
