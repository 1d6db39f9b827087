// crates/gr_physics/src/boundary/mod.rs

//! 边界处理
//!
//! - [`conditions`]: 物理边界（外流、反射、禁止内流）
//! - [`halo`]: ghost 区交换（周期回绕与进程间交换）

pub mod conditions;
pub mod halo;

pub use conditions::BoundaryConditions;
pub use halo::{sync_ghosts, HaloExchange, SerialExchange};
