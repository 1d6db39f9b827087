// crates/gr_physics/src/engine/mod.rs

//! 时间推进
//!
//! - [`ct`]: 棱心 EMF 与磁场通量改写
//! - [`stepper`]: 预估-校正推进器
//! - [`metrics`]: 推进统计

pub mod ct;
pub mod metrics;
pub mod stepper;

pub use ct::{advance_interior, EdgeEmf};
pub use metrics::StepMetrics;
pub use stepper::CtStepper;
