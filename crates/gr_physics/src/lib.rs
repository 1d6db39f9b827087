// crates/gr_physics/src/lib.rs

//! GR 磁流体核心 (Layer 3)
//!
//! 在固定的弯曲时空背景上推进理想磁流体，包括：
//! - 网格与进程拓扑 (grid)
//! - 时空几何：度规、联络系数 (geometry)
//! - 状态存储 (state)
//! - 边界条件与 ghost 交换 (boundary)
//! - 数值格式 (schemes)
//! - 约束输运时间推进 (engine)
//! - 散度诊断 (diagnostics)
//! - 由配置组装 (builder)
//!
//! # Trait 抽象
//!
//! - [`FluxScheme`]: 面通量与源项
//! - [`PrimitiveRecovery`]: 守恒量 ↔ 原始量
//! - [`HaloExchange`]: ghost 区交换
//!
//! # 示例
//!
//! ```no_run
//! use std::sync::Arc;
//! use gr_config::SimulationConfig;
//! use gr_physics::SimulationBuilder;
//!
//! let builder = SimulationBuilder::from_config(SimulationConfig::default())?;
//! let geometry = Arc::new(builder.build_geometry()?);
//! let initial = builder.initial_state(geometry.grid());
//! let mut stepper = builder.build_stepper(geometry, initial)?;
//! stepper.time_step()?;
//! println!("max|div B| = {:e}", stepper.compute_div_b().max_abs());
//! # Ok::<(), gr_foundation::GrError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod builder;
pub mod diagnostics;
pub mod engine;
pub mod geometry;
pub mod grid;
pub mod schemes;
pub mod state;

/// 层级标识
pub const LAYER: u8 = 3;

pub use boundary::{sync_ghosts, BoundaryConditions, HaloExchange, SerialExchange};
pub use builder::{ReferenceStepper, SimulationBuilder};
pub use diagnostics::{compute_div_b, DivergenceField};
pub use engine::{CtStepper, EdgeEmf, StepMetrics};
pub use geometry::{
    christoffel, horizon_radius, Connection, ConnectionStencil, Geometry, GeometryParameters,
    MetricField, SpacetimeMap,
};
pub use grid::{CommHandle, CoordinateGrid, Location, ProcessTopology, ZoneBox};
pub use schemes::{
    DensitizedRecovery, FaceFluxes, FluxScheme, InductionFlux, PrimitiveRecovery, RecoveryFailure,
};
pub use state::FluidState;
