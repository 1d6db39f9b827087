// crates/gr_config/src/lib.rs

//! GR 磁流体配置层 (Layer 4)
//!
//! 模拟的构造参数：网格分辨率、维数、ghost 宽度、计算域范围、时空类型、
//! 自旋与 θ 压缩斜率、时间与步长、六个面的边界类型以及变量数。
//! 配置只描述参数，不涉及任何文件格式之外的持久化。
//!
//! # 模块概览
//!
//! - [`kinds`]: 可序列化的枚举（时空、边界、限制器）
//! - [`simulation_config`]: `SimulationConfig` 及各分节
//! - [`error`]: 配置错误类型

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod kinds;
pub mod simulation_config;

/// 层级标识
pub const LAYER: u8 = 4;

pub use error::ConfigError;
pub use kinds::{BoundaryKind, Face, SlopeLimiter, SpacetimeKind};
pub use simulation_config::{
    BoundaryConfig, GridConfig, SchemeConfig, SimulationConfig, SpacetimeConfig, TimeConfig,
};
