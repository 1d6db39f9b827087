// crates/gr_physics/src/engine/metrics.rs

//! 推进统计

use std::time::Duration;

use serde::Serialize;
use tracing::info;

/// 推进统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepMetrics {
    /// 成功步数
    pub steps_completed: u64,
    /// 失败步数
    pub failed_steps: u64,
    /// 最近一步耗时
    pub last_step: Duration,
    /// 累计耗时
    pub total_elapsed: Duration,
    /// 最近一次诊断的 max|div B|
    pub last_div_b: Option<f64>,
    /// 内部区块数
    pub active_zones: usize,
}

impl StepMetrics {
    /// 记录一次成功推进
    pub fn record_step(&mut self, elapsed: Duration) {
        self.steps_completed += 1;
        self.last_step = elapsed;
        self.total_elapsed += elapsed;
    }

    /// 记录一次失败推进
    pub fn record_failure(&mut self) {
        self.failed_steps += 1;
    }

    /// 每秒更新的区块数
    pub fn zones_per_second(&self) -> f64 {
        let secs = self.total_elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.active_zones as f64 * self.steps_completed as f64) / secs
    }

    /// 单行摘要
    pub fn report(&self) -> String {
        let div_b = match self.last_div_b {
            Some(v) => format!("{:.3e}", v),
            None => "-".to_string(),
        };
        format!(
            "步数: {}, 失败: {}, 本步 {:.3}ms, 累计 {:.3}s, 区块: {}, max|divB|: {}",
            self.steps_completed,
            self.failed_steps,
            self.last_step.as_secs_f64() * 1e3,
            self.total_elapsed.as_secs_f64(),
            self.active_zones,
            div_b
        )
    }

    /// 通过 tracing 输出摘要
    pub fn log(&self) {
        info!("{}", self.report());
    }
}
