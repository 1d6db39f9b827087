// crates/gr_physics/src/schemes/mod.rs

//! 数值格式
//!
//! - [`traits`]: 通量与恢复接口
//! - [`muscl`]: 斜率限制重构
//! - [`induction`]: 感应方程参考通量
//! - [`recovery`]: 参考原始量恢复

pub mod induction;
pub mod muscl;
pub mod recovery;
pub mod traits;

pub use induction::InductionFlux;
pub use muscl::{limited_slope, limiter_phi, reconstruct_face};
pub use recovery::DensitizedRecovery;
pub use traits::{FaceFluxes, FluxScheme, PrimitiveRecovery, RecoveryFailure};
