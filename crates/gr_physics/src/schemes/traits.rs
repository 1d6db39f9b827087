// crates/gr_physics/src/schemes/traits.rs

//! 格式抽象层
//!
//! 步进器只依赖这里的接口：
//!
//! - [`FluxScheme`]: 面通量与源项
//! - [`PrimitiveRecovery`]: 原始量 ↔ 守恒量
//!
//! # 面通量约定
//!
//! `F_a[v](k, j, i)` 是区块 (i, j, k) 沿 `a` 方向**下侧**面的通量。
//! 格式负责填充 `idx_a ∈ [w, N_a,total − w]` 的面（`w` 为模板宽度），
//! 横向覆盖全部区块（含 ghost）。

use thiserror::Error;

use crate::geometry::Geometry;
use crate::grid::{CoordinateGrid, ZoneBox};
use crate::state::FluidState;
use gr_foundation::{GrResult, ZoneIndex};

/// 三个方向的面通量
#[derive(Debug, Clone, PartialEq)]
pub struct FaceFluxes {
    fluxes: [FluidState; 3],
}

impl FaceFluxes {
    /// 按网格创建全零通量
    pub fn new(num_vars: usize, grid: &CoordinateGrid) -> Self {
        Self {
            fluxes: [
                FluidState::new(num_vars, grid),
                FluidState::new(num_vars, grid),
                FluidState::new(num_vars, grid),
            ],
        }
    }

    /// 沿 `axis` 的通量
    #[inline]
    pub fn axis(&self, axis: usize) -> &FluidState {
        &self.fluxes[axis]
    }

    /// 沿 `axis` 的通量（可变）
    #[inline]
    pub fn axis_mut(&mut self, axis: usize) -> &mut FluidState {
        &mut self.fluxes[axis]
    }

    /// 读取 `F_axis[v]` 在区块下侧面的值
    #[inline]
    pub fn get(&self, axis: usize, v: usize, zone: ZoneIndex) -> f64 {
        self.fluxes[axis].get(v, zone)
    }

    /// 写入 `F_axis[v]`
    #[inline]
    pub fn set(&mut self, axis: usize, v: usize, zone: ZoneIndex, value: f64) {
        self.fluxes[axis].set(v, zone, value);
    }

    /// 全部置零
    pub fn clear(&mut self) {
        for f in self.fluxes.iter_mut() {
            f.vars_mut().fill(0.0);
        }
    }
}

/// 原始量恢复失败
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("区块 {zone} 变量 {variable} 恢复失败")]
pub struct RecoveryFailure {
    /// 失败区块
    pub zone: ZoneIndex,
    /// 失败变量
    pub variable: usize,
}

/// 通量格式
pub trait FluxScheme: Send + Sync {
    /// 格式名称
    fn name(&self) -> &str;

    /// 模板宽度：计算一个面通量需要的单侧区块数
    fn stencil_width(&self) -> usize;

    /// 由原始量计算三个方向的面通量
    fn face_fluxes(
        &self,
        geometry: &Geometry,
        prim: &FluidState,
        fluxes: &mut FaceFluxes,
    ) -> GrResult<()>;

    /// 源项（默认为零）
    ///
    /// 弯曲时空的几何源项由 `geometry.connection_at(zone)` 给出的 Γ 构造。
    fn source_terms(
        &self,
        _geometry: &Geometry,
        _prim: &FluidState,
        sources: &mut FluidState,
    ) -> GrResult<()> {
        sources.vars_mut().fill(0.0);
        Ok(())
    }
}

/// 原始量恢复
pub trait PrimitiveRecovery: Send + Sync {
    /// 名称
    fn name(&self) -> &str;

    /// 原始量 → 守恒量（索引盒内）
    fn prim_to_cons(
        &self,
        geometry: &Geometry,
        prim: &FluidState,
        cons: &mut FluidState,
        region: &ZoneBox,
    ) -> GrResult<()>;

    /// 守恒量 → 原始量（索引盒内）
    fn cons_to_prim(
        &self,
        geometry: &Geometry,
        cons: &FluidState,
        prim: &mut FluidState,
        region: &ZoneBox,
    ) -> Result<(), RecoveryFailure>;
}
