// crates/gr_config/src/simulation_config.rs

//! SimulationConfig - 模拟配置
//!
//! 所有构造参数均为纯数值/枚举，使用 JSON 序列化。默认值即参考配置：
//! 8×8×8 周期网格，dim = 3，3 层 ghost，X ∈ [0, 1]³，平直时空，dt = 0.002。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::kinds::{BoundaryKind, Face, SlopeLimiter, SpacetimeKind};
use gr_foundation::constants::{defaults, vars};

/// 模拟配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 网格配置
    #[serde(default)]
    pub grid: GridConfig,

    /// 时空配置
    #[serde(default)]
    pub spacetime: SpacetimeConfig,

    /// 时间配置
    #[serde(default)]
    pub time: TimeConfig,

    /// 六个面的边界类型
    #[serde(default)]
    pub boundaries: BoundaryConfig,

    /// 参考通量格式配置
    #[serde(default)]
    pub scheme: SchemeConfig,

    /// 变量数
    #[serde(default = "default_num_vars")]
    pub num_vars: usize,
}

fn default_num_vars() -> usize { vars::MIN_VARS }

/// 网格配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// X1 方向网格数
    #[serde(default = "default_n")]
    pub n1: usize,
    /// X2 方向网格数
    #[serde(default = "default_n")]
    pub n2: usize,
    /// X3 方向网格数
    #[serde(default = "default_n")]
    pub n3: usize,
    /// 空间维数 (1/2/3)
    #[serde(default = "default_dim")]
    pub dim: usize,
    /// ghost 层宽度
    #[serde(default = "default_num_ghost")]
    pub num_ghost: usize,
    /// X1 起点
    #[serde(default)]
    pub x1_start: f64,
    /// X1 终点
    #[serde(default = "default_end")]
    pub x1_end: f64,
    /// X2 起点
    #[serde(default)]
    pub x2_start: f64,
    /// X2 终点
    #[serde(default = "default_end")]
    pub x2_end: f64,
    /// X3 起点
    #[serde(default)]
    pub x3_start: f64,
    /// X3 终点
    #[serde(default = "default_end")]
    pub x3_end: f64,
}

fn default_n() -> usize { defaults::N }
fn default_dim() -> usize { defaults::DIM }
fn default_num_ghost() -> usize { defaults::NUM_GHOST }
fn default_end() -> f64 { 1.0 }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            n1: default_n(),
            n2: default_n(),
            n3: default_n(),
            dim: default_dim(),
            num_ghost: default_num_ghost(),
            x1_start: 0.0,
            x1_end: default_end(),
            x2_start: 0.0,
            x2_end: default_end(),
            x3_start: 0.0,
            x3_end: default_end(),
        }
    }
}

impl GridConfig {
    /// 每方向网格数 [N1, N2, N3]
    pub fn n(&self) -> [usize; 3] {
        [self.n1, self.n2, self.n3]
    }

    /// 计算域起点
    pub fn start(&self) -> [f64; 3] {
        [self.x1_start, self.x2_start, self.x3_start]
    }

    /// 计算域终点
    pub fn end(&self) -> [f64; 3] {
        [self.x1_end, self.x2_end, self.x3_end]
    }
}

/// 时空配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacetimeConfig {
    /// 时空类型
    #[serde(default)]
    pub kind: SpacetimeKind,
    /// 黑洞自旋 a（平直时空忽略）
    #[serde(default = "default_spin")]
    pub black_hole_spin: f64,
    /// θ 压缩斜率 h（平直时空忽略）
    #[serde(default = "default_h_slope")]
    pub h_slope: f64,
}

fn default_spin() -> f64 { defaults::BLACK_HOLE_SPIN }
fn default_h_slope() -> f64 { defaults::H_SLOPE }

impl SpacetimeConfig {
    /// 外视界半径 r+ = 1 + sqrt(1 - a²)（M = 1）
    pub fn horizon_radius(&self) -> f64 {
        1.0 + (1.0 - self.black_hole_spin * self.black_hole_spin).max(0.0).sqrt()
    }
}

impl Default for SpacetimeConfig {
    fn default() -> Self {
        Self {
            kind: SpacetimeKind::default(),
            black_hole_spin: default_spin(),
            h_slope: default_h_slope(),
        }
    }
}

/// 时间配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// 初始时间
    #[serde(default)]
    pub start_time: f64,
    /// 时间步长
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// 结束时间
    #[serde(default = "default_final_time")]
    pub final_time: f64,
}

fn default_dt() -> f64 { defaults::DT }
fn default_final_time() -> f64 { 2.0 }

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            dt: default_dt(),
            final_time: default_final_time(),
        }
    }
}

/// 边界配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundaryConfig {
    /// X1 下侧
    #[serde(default)]
    pub x1_lower: BoundaryKind,
    /// X1 上侧
    #[serde(default)]
    pub x1_upper: BoundaryKind,
    /// X2 下侧
    #[serde(default)]
    pub x2_lower: BoundaryKind,
    /// X2 上侧
    #[serde(default)]
    pub x2_upper: BoundaryKind,
    /// X3 下侧
    #[serde(default)]
    pub x3_lower: BoundaryKind,
    /// X3 上侧
    #[serde(default)]
    pub x3_upper: BoundaryKind,
}

impl BoundaryConfig {
    /// 所有面使用同一类型
    pub fn uniform(kind: BoundaryKind) -> Self {
        Self {
            x1_lower: kind,
            x1_upper: kind,
            x2_lower: kind,
            x2_upper: kind,
            x3_lower: kind,
            x3_upper: kind,
        }
    }

    /// 查询某个面的边界类型
    pub fn kind(&self, face: Face) -> BoundaryKind {
        match face {
            Face::X1Lower => self.x1_lower,
            Face::X1Upper => self.x1_upper,
            Face::X2Lower => self.x2_lower,
            Face::X2Upper => self.x2_upper,
            Face::X3Lower => self.x3_lower,
            Face::X3Upper => self.x3_upper,
        }
    }

    /// 设置某个面的边界类型
    pub fn set(&mut self, face: Face, kind: BoundaryKind) {
        let slot = match face {
            Face::X1Lower => &mut self.x1_lower,
            Face::X1Upper => &mut self.x1_upper,
            Face::X2Lower => &mut self.x2_lower,
            Face::X2Upper => &mut self.x2_upper,
            Face::X3Lower => &mut self.x3_lower,
            Face::X3Upper => &mut self.x3_upper,
        };
        *slot = kind;
    }
}

/// 参考通量格式配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchemeConfig {
    /// 斜率限制器
    #[serde(default)]
    pub limiter: SlopeLimiter,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            spacetime: SpacetimeConfig::default(),
            time: TimeConfig::default(),
            boundaries: BoundaryConfig::default(),
            scheme: SchemeConfig::default(),
            num_vars: default_num_vars(),
        }
    }
}

impl SimulationConfig {
    /// Modified Kerr-Schild 参考配置
    ///
    /// 径向对数分布，内边界面落在视界上，外边界 r = 40：任意 N1 下内部区块
    /// 中心都在视界外，只有 ghost 层伸入视界。
    /// X2 严格位于 (0, 1) 内以避开极点。X1 两侧禁止回流，X2 反射，X3 周期。
    pub fn modified_kerr_schild(n1: usize, n2: usize, n3: usize, spin: f64, h_slope: f64) -> Self {
        let spacetime = SpacetimeConfig {
            kind: SpacetimeKind::ModifiedKerrSchild,
            black_hole_spin: spin,
            h_slope,
        };
        let dim = if n3 > 1 { 3 } else if n2 > 1 { 2 } else { 1 };
        let mut boundaries = BoundaryConfig::uniform(BoundaryKind::Periodic);
        boundaries.x1_lower = BoundaryKind::NoInflow;
        boundaries.x1_upper = BoundaryKind::NoInflow;
        boundaries.x2_lower = BoundaryKind::Reflecting;
        boundaries.x2_upper = BoundaryKind::Reflecting;

        Self {
            grid: GridConfig {
                n1,
                n2,
                n3,
                dim,
                num_ghost: defaults::NUM_GHOST,
                x1_start: spacetime.horizon_radius().ln(),
                x1_end: 40.0_f64.ln(),
                x2_start: 1e-8,
                x2_end: 1.0 - 1e-8,
                x3_start: 0.0,
                x3_end: 1.0,
            },
            spacetime,
            time: TimeConfig::default(),
            boundaries,
            scheme: SchemeConfig::default(),
            num_vars: default_num_vars(),
        }
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;

        let config: SimulationConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_grid()?;
        self.validate_spacetime()?;
        self.validate_time()?;
        self.validate_boundaries()?;

        if self.num_vars < vars::MIN_VARS {
            return Err(ConfigError::invalid(
                "num_vars",
                self.num_vars,
                format!("磁流体至少需要 {} 个变量", vars::MIN_VARS),
            ));
        }
        Ok(())
    }

    fn validate_grid(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if !(1..=3).contains(&grid.dim) {
            return Err(ConfigError::invalid("grid.dim", grid.dim, "维数必须为 1、2 或 3"));
        }

        let keys = ["grid.n1", "grid.n2", "grid.n3"];
        for (axis, (&n, key)) in grid.n().iter().zip(keys).enumerate() {
            if n == 0 {
                return Err(ConfigError::invalid(key, n, "网格数必须 >= 1"));
            }
            if axis >= grid.dim && n != 1 {
                return Err(ConfigError::invalid(key, n, "塌缩方向的网格数必须为 1"));
            }
        }

        if grid.num_ghost == 0 {
            return Err(ConfigError::invalid("grid.num_ghost", 0, "ghost 层宽度必须 > 0"));
        }

        let extents = ["grid.x1", "grid.x2", "grid.x3"];
        for ((start, end), key) in grid.start().iter().zip(grid.end()).zip(extents) {
            if !start.is_finite() || !end.is_finite() || *start >= end {
                return Err(ConfigError::invalid(
                    key,
                    format!("[{}, {}]", start, end),
                    "起点必须小于终点",
                ));
            }
        }
        Ok(())
    }

    fn validate_spacetime(&self) -> Result<(), ConfigError> {
        if self.spacetime.kind != SpacetimeKind::ModifiedKerrSchild {
            return Ok(());
        }
        let spin = self.spacetime.black_hole_spin;
        if !(spin.abs() < 1.0) {
            return Err(ConfigError::invalid(
                "spacetime.black_hole_spin",
                spin,
                "自旋必须满足 |a| < 1",
            ));
        }
        let h = self.spacetime.h_slope;
        if !(h > 0.0 && h <= 1.0) {
            return Err(ConfigError::invalid("spacetime.h_slope", h, "h 必须在 (0, 1] 范围内"));
        }
        if self.grid.x2_start <= 0.0 || self.grid.x2_end >= 1.0 {
            return Err(ConfigError::invalid(
                "grid.x2",
                format!("[{}, {}]", self.grid.x2_start, self.grid.x2_end),
                "X2 必须严格位于 (0, 1) 内以避开极点",
            ));
        }

        // 第一个内部区块中心 r = exp(X1_start + dX1/2)
        let grid = &self.grid;
        let r_inner = (grid.x1_start + 0.5 * (grid.x1_end - grid.x1_start) / grid.n1 as f64).exp();
        let r_horizon = self.spacetime.horizon_radius();
        if r_inner <= r_horizon {
            return Err(ConfigError::invalid(
                "grid.x1_start",
                grid.x1_start,
                format!("内部区块 r = {:.6} 位于视界 r+ = {:.6} 之内", r_inner, r_horizon),
            ));
        }
        Ok(())
    }

    fn validate_time(&self) -> Result<(), ConfigError> {
        let time = &self.time;
        if !(time.dt > 0.0) || !time.dt.is_finite() {
            return Err(ConfigError::invalid("time.dt", time.dt, "时间步长必须为正"));
        }
        if time.final_time < time.start_time {
            return Err(ConfigError::invalid(
                "time.final_time",
                time.final_time,
                "结束时间不能早于初始时间",
            ));
        }
        Ok(())
    }

    fn validate_boundaries(&self) -> Result<(), ConfigError> {
        for axis in 0..self.grid.dim {
            let lower = self.boundaries.kind(Face::from_axis(axis, false));
            let upper = self.boundaries.kind(Face::from_axis(axis, true));
            if lower.is_periodic() != upper.is_periodic() {
                return Err(ConfigError::invalid(
                    "boundaries",
                    format!("{} / {}", lower, upper),
                    format!("X{} 方向的周期边界必须成对设置", axis + 1),
                ));
            }
        }
        Ok(())
    }

    /// 总步数（按结束时间估算）
    pub fn num_steps(&self) -> usize {
        ((self.time.final_time - self.time.start_time) / self.time.dt).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.n(), [8, 8, 8]);
        assert_eq!(config.grid.num_ghost, 3);
        assert_eq!(config.num_vars, 8);
        assert_eq!(config.num_steps(), 1000);
    }

    #[test]
    fn test_kerr_schild_preset() {
        let config = SimulationConfig::modified_kerr_schild(16, 16, 16, 0.9, 0.3);
        assert!(config.validate().is_ok());
        assert_eq!(config.boundaries.kind(Face::X2Lower), BoundaryKind::Reflecting);
        assert!(config.grid.x1_start < config.grid.x1_end);
    }

    #[test]
    fn test_kerr_schild_preset_interior_outside_horizon() {
        for n1 in [4, 16, 96, 128, 1024] {
            let config = SimulationConfig::modified_kerr_schild(n1, 16, 1, 0.9, 0.3);
            assert!(config.validate().is_ok(), "N1 = {}", n1);
            let r_h = config.spacetime.horizon_radius();
            assert!((config.grid.x1_start.exp() - r_h).abs() < 1e-12);
        }
    }

    #[test]
    fn test_interior_inside_horizon_rejected() {
        let mut config = SimulationConfig::modified_kerr_schild(128, 16, 1, 0.9, 0.3);
        config.grid.x1_start = (0.98 * config.spacetime.horizon_radius()).ln();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "grid.x1_start"
        ));

        // 平直时空不检查视界
        let mut flat = SimulationConfig::default();
        flat.grid.x1_start = -10.0;
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn test_invalid_dt() {
        let mut config = SimulationConfig::default();
        config.time.dt = -1.0;
        assert!(config.validate().is_err());
        config.time.dt = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_collapsed_axis_requires_single_zone() {
        let mut config = SimulationConfig::default();
        config.grid.dim = 2;
        assert!(config.validate().is_err());
        config.grid.n3 = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_spin() {
        let mut config = SimulationConfig::modified_kerr_schild(8, 8, 1, 0.5, 0.3);
        config.spacetime.black_hole_spin = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_pole_margin() {
        let mut config = SimulationConfig::modified_kerr_schild(8, 8, 1, 0.5, 0.3);
        config.grid.x2_start = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unpaired_periodic() {
        let mut config = SimulationConfig::default();
        config.boundaries.set(Face::X2Upper, BoundaryKind::Outflow);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = SimulationConfig::modified_kerr_schild(16, 8, 1, 0.9, 0.3);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.spacetime.kind, SpacetimeKind::ModifiedKerrSchild);
        assert_eq!(parsed.boundaries, config.boundaries);
        assert_eq!(parsed.grid.n(), [16, 8, 1]);
        assert!((parsed.grid.x1_start - config.grid.x1_start).abs() < 1e-15);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: SimulationConfig = serde_json::from_str(r#"{"time": {"dt": 0.01}}"#).unwrap();
        assert_eq!(parsed.time.dt, 0.01);
        assert_eq!(parsed.grid, GridConfig::default());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        let config = SimulationConfig::default();
        config.save_to_file(&path).unwrap();
        let loaded = SimulationConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
