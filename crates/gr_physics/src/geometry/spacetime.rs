// crates/gr_physics/src/geometry/spacetime.rs

//! 时空解析描述
//!
//! 逻辑坐标到物理坐标的映射以及逻辑坐标下的协变度规。
//!
//! ## Modified Kerr-Schild (M = 1)
//!
//! ```text
//! r = exp(X1)
//! θ = πX2 + ½(1 - h) sin(2πX2)
//! φ = 2πX3
//! ```
//!
//! 径向对数分布（视界附近加密），θ 方向向赤道面压缩。度规先按 Kerr-Schild
//! 形式以 σ = r² + a²cos²θ 写出，再乘以各指标的 Jacobian
//! ∂r/∂X1 = r、∂θ/∂X2、∂φ/∂X3 完成二阶张量的坐标变换。
//! φ 方向的 2π 因子不进入度规：度规分量以 φ 为第三坐标。
//!
//! ## 参考文献
//!
//! McKinney, J. C., & Gammie, C. F. (2004). A measurement of the electromagnetic
//! luminosity of a Kerr black hole. ApJ, 611, 977.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use gr_config::SpacetimeKind;
use gr_foundation::constants::tolerances;
use gr_foundation::tensor::{Tensor2, MINKOWSKI, ZERO2};
use gr_foundation::{GrError, GrResult};

/// 时空参数 {自旋 a, θ 压缩斜率 h}，平直时空忽略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryParameters {
    /// 黑洞自旋
    pub black_hole_spin: f64,
    /// θ 压缩斜率
    pub h_slope: f64,
}

impl GeometryParameters {
    /// 创建参数
    pub fn new(black_hole_spin: f64, h_slope: f64) -> Self {
        Self {
            black_hole_spin,
            h_slope,
        }
    }

    /// 平直时空占位参数
    pub fn flat() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// 外视界半径 r₊ = 1 + sqrt(1 - a²)
#[inline]
pub fn horizon_radius(spin: f64) -> f64 {
    1.0 + (1.0 - spin * spin).max(0.0).sqrt()
}

/// 时空解析映射
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacetimeMap {
    kind: SpacetimeKind,
    params: GeometryParameters,
}

impl SpacetimeMap {
    /// 创建映射并检查参数
    pub fn new(kind: SpacetimeKind, params: GeometryParameters) -> GrResult<Self> {
        if kind == SpacetimeKind::ModifiedKerrSchild {
            let a = params.black_hole_spin;
            if !(a.abs() < 1.0) {
                return Err(GrError::invalid_parameter(format!(
                    "黑洞自旋 a = {} 必须满足 |a| < 1",
                    a
                )));
            }
            let h = params.h_slope;
            if !(h > 0.0 && h <= 1.0) {
                return Err(GrError::invalid_parameter(format!(
                    "θ 压缩斜率 h = {} 必须在 (0, 1] 范围内",
                    h
                )));
            }
        }
        Ok(Self { kind, params })
    }

    /// 时空类型
    #[inline]
    pub fn kind(&self) -> SpacetimeKind {
        self.kind
    }

    /// 时空参数
    #[inline]
    pub fn params(&self) -> GeometryParameters {
        self.params
    }

    #[inline]
    fn theta(&self, x2: f64) -> f64 {
        PI * x2 + 0.5 * (1.0 - self.params.h_slope) * (2.0 * PI * x2).sin()
    }

    #[inline]
    fn dtheta_dx2(&self, x2: f64) -> f64 {
        PI * (1.0 + (1.0 - self.params.h_slope) * (2.0 * PI * x2).cos())
    }

    /// 逻辑坐标 → 物理坐标：MKS 为 (r, θ, φ)，平直时空为恒等映射
    pub fn to_physical(&self, x: [f64; 3]) -> [f64; 3] {
        match self.kind {
            SpacetimeKind::Flat => x,
            SpacetimeKind::ModifiedKerrSchild => {
                [x[0].exp(), self.theta(x[1]), 2.0 * PI * x[2]]
            }
        }
    }

    /// 物理坐标 → 逻辑坐标
    ///
    /// θ(X2) 单调（h ∈ (0, 1]），用 Newton 迭代求逆。
    pub fn to_logical(&self, xp: [f64; 3]) -> GrResult<[f64; 3]> {
        match self.kind {
            SpacetimeKind::Flat => Ok(xp),
            SpacetimeKind::ModifiedKerrSchild => {
                if !(xp[0] > 0.0) {
                    return Err(GrError::invalid_parameter(format!("r = {} 必须为正", xp[0])));
                }
                let target = xp[1];
                let mut x2 = target / PI;
                for _ in 0..tolerances::INVERSE_MAP_MAX_ITER {
                    let step = (self.theta(x2) - target) / self.dtheta_dx2(x2);
                    x2 -= step;
                    if step.abs() < tolerances::INVERSE_MAP {
                        return Ok([xp[0].ln(), x2, xp[2] / (2.0 * PI)]);
                    }
                }
                Err(GrError::invalid_parameter(format!(
                    "θ = {} 的逆映射未收敛",
                    target
                )))
            }
        }
    }

    /// 逻辑坐标下的协变度规 gCov
    pub fn gcov(&self, x: [f64; 3]) -> Tensor2 {
        match self.kind {
            SpacetimeKind::Flat => MINKOWSKI,
            SpacetimeKind::ModifiedKerrSchild => self.gcov_mks(x),
        }
    }

    fn gcov_mks(&self, x: [f64; 3]) -> Tensor2 {
        let a = self.params.black_hole_spin;
        let r = x[0].exp();
        let theta = self.theta(x[1]);

        let dr_dx1 = r;
        let dtheta_dx2 = self.dtheta_dx2(x[1]);

        let cos_theta = theta.cos();
        let mut sin_theta = theta.sin();
        if sin_theta.abs() < tolerances::SIN_THETA_FLOOR {
            sin_theta = tolerances::SIN_THETA_FLOOR.copysign(sin_theta);
        }
        let sin2 = sin_theta * sin_theta;

        let sigma = r * r + (a * cos_theta) * (a * cos_theta);
        let two_r_sigma = 2.0 * r / sigma;

        let mut g = ZERO2;
        g[0][0] = -(1.0 - two_r_sigma);
        g[0][1] = two_r_sigma * dr_dx1;
        g[0][3] = -a * two_r_sigma * sin2;
        g[1][1] = (1.0 + two_r_sigma) * dr_dx1 * dr_dx1;
        g[1][3] = -a * (1.0 + two_r_sigma) * sin2 * dr_dx1;
        g[2][2] = sigma * dtheta_dx2 * dtheta_dx2;
        g[3][3] = sin2 * (sigma + a * a * (1.0 + two_r_sigma) * sin2);

        g[1][0] = g[0][1];
        g[3][0] = g[0][3];
        g[3][1] = g[1][3];
        g
    }
}
