// crates/gr_foundation/src/lib.rs

//! GR 磁流体基础层 (Layer 1)
//!
//! 为上层 crate 提供与物理无关的公共设施：
//!
//! - [`error`]: 统一错误类型 `GrError` 与 `GrResult`
//! - [`index`]: 区块索引 `ZoneIndex` 与时间推进阶段 `StepStage`
//! - [`constants`]: 变量编号、数值容差与默认参数
//! - [`tensor`]: 4×4 张量工具（行列式、求逆、对称化）
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: gr_cli        ─> 命令行
//! Layer 4: gr_config     ─> SimulationConfig
//! Layer 3: gr_physics    ─> Geometry, CtStepper
//! Layer 1: gr_foundation ─> GrError, Tensor2 (本层)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod error;
pub mod index;
pub mod tensor;

/// 层级标识
pub const LAYER: u8 = 1;

pub use error::{GrError, GrResult};
pub use index::{StepStage, ZoneIndex};
pub use tensor::{Tensor2, Tensor3};
