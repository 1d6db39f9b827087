// crates/gr_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `GrError` 枚举和 `GrResult` 类型别名。几何构建阶段的错误是致命的，
//! 必须在时间推进开始前报告；推进阶段的错误携带区块索引与阶段，
//! 由调用方决定重试（例如减半 dt）或终止。
//!
//! # 示例
//!
//! ```
//! use gr_foundation::error::{GrError, GrResult};
//!
//! fn check_spin(a: f64) -> GrResult<()> {
//!     if a.abs() >= 1.0 {
//!         return Err(GrError::invalid_parameter(format!("自旋 {} 超出 (-1, 1)", a)));
//!     }
//!     Ok(())
//! }
//! assert!(check_spin(1.0).is_err());
//! ```

use thiserror::Error;

use crate::index::{StepStage, ZoneIndex};

/// 统一结果类型
pub type GrResult<T> = Result<T, GrError>;

/// GR 磁流体错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrError {
    // ========================================================================
    // 构建期错误
    // ========================================================================
    /// 参数无效（时空参数畸形或计算域伸入视界）
    #[error("参数无效: {message}")]
    InvalidParameter {
        /// 说明无效原因
        message: String,
    },

    /// 网格描述无效
    #[error("网格无效: {message}")]
    InvalidGrid {
        /// 说明无效原因
        message: String,
    },

    /// 数据尚未就绪（联络系数未计算，或差分模板越出 ghost 层）
    #[error("数据未就绪: {message}")]
    NotReady {
        /// 说明缺失内容
        message: String,
    },

    /// 度规在某区块数值上不可逆
    #[error("度规奇异: 区块 {zone}, det = {determinant:e}")]
    SingularMetric {
        /// 出错区块
        zone: ZoneIndex,
        /// 协变度规行列式
        determinant: f64,
    },

    // ========================================================================
    // 推进期错误
    // ========================================================================
    /// 原始变量恢复或通量计算产生非有限值
    #[error("非有限状态: 区块 {zone}, 阶段 {stage}, 变量 {variable}")]
    NonFiniteState {
        /// 出错区块
        zone: ZoneIndex,
        /// 出错阶段
        stage: StepStage,
        /// 变量编号
        variable: usize,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 错误信息
        message: String,
    },
}

impl GrError {
    /// 创建参数无效错误
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// 创建网格无效错误
    pub fn invalid_grid(message: impl Into<String>) -> Self {
        Self::InvalidGrid {
            message: message.into(),
        }
    }

    /// 创建未就绪错误
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady {
            message: message.into(),
        }
    }

    /// 创建度规奇异错误
    pub fn singular_metric(zone: ZoneIndex, determinant: f64) -> Self {
        Self::SingularMetric { zone, determinant }
    }

    /// 创建非有限状态错误
    pub fn non_finite(zone: ZoneIndex, stage: StepStage, variable: usize) -> Self {
        Self::NonFiniteState {
            zone,
            stage,
            variable,
        }
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 出错区块（若有）
    pub fn zone(&self) -> Option<ZoneIndex> {
        match self {
            Self::SingularMetric { zone, .. } | Self::NonFiniteState { zone, .. } => Some(*zone),
            _ => None,
        }
    }

    /// 是否为推进期错误（可由调用方减小 dt 后重试）
    pub fn is_step_error(&self) -> bool {
        matches!(self, Self::NonFiniteState { .. })
    }
}
