// crates/gr_physics/src/geometry/metric.rs

//! 单区块度规量
//!
//! `MetricField` 打包协变度规、逆变度规、g = sqrt(-det gCov) 与 lapse
//! alpha = 1/sqrt(-gCon[0][0])。构造时即检查可逆性，奇异度规直接报错，
//! 不做任何正则化。

use gr_foundation::constants::tolerances;
use gr_foundation::tensor::{self, Tensor2, MINKOWSKI};
use gr_foundation::{GrError, GrResult, ZoneIndex};

/// 单区块度规量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricField {
    /// 协变度规 g_{μν}
    pub gcov: Tensor2,
    /// 逆变度规 g^{μν}
    pub gcon: Tensor2,
    /// sqrt(-det g_{μν})
    pub g: f64,
    /// lapse
    pub alpha: f64,
}

impl Default for MetricField {
    fn default() -> Self {
        Self::minkowski()
    }
}

impl MetricField {
    /// 平直度规
    pub fn minkowski() -> Self {
        Self {
            gcov: MINKOWSKI,
            gcon: MINKOWSKI,
            g: 1.0,
            alpha: 1.0,
        }
    }

    /// 由协变度规构造
    ///
    /// det gCov 必须为有限负数，gCon[0][0] 必须为负，否则返回
    /// `SingularMetric` 并附带区块索引。
    pub fn from_gcov(gcov: Tensor2, zone: ZoneIndex) -> GrResult<Self> {
        let det = tensor::determinant(&gcov);
        if !det.is_finite() || !(det < -tolerances::SINGULAR_DETERMINANT) {
            return Err(GrError::singular_metric(zone, det));
        }
        let inv = tensor::inverse(&gcov).ok_or_else(|| GrError::singular_metric(zone, det))?;
        let gcon = tensor::symmetrize(&inv);
        if !(gcon[0][0] < 0.0) {
            return Err(GrError::singular_metric(zone, det));
        }

        Ok(Self {
            gcov,
            gcon,
            g: (-det).sqrt(),
            alpha: 1.0 / (-gcon[0][0]).sqrt(),
        })
    }

    /// 将协变矢量升指标
    pub fn raise(&self, v: [f64; 4]) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (mu, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|nu| self.gcon[mu][nu] * v[nu]).sum();
        }
        out
    }

    /// 将逆变矢量降指标
    pub fn lower(&self, v: [f64; 4]) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (mu, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|nu| self.gcov[mu][nu] * v[nu]).sum();
        }
        out
    }
}
