// crates/gr_physics/src/schemes/induction.rs

//! 理想感应方程的参考通量格式
//!
//! 速度场作为被动量随流输运，磁场按理想感应方程演化：
//!
//! ```text
//! F^j[q]   = g·u^j·q                  (非磁场变量)
//! F^j[B^i] = g·(u^j·B^i − u^i·B^j)     (磁场变量)
//! ```
//!
//! 面状态由 MUSCL 重构得到，数值通量为 Rusanov（局部 Lax-Friedrichs）：
//! `F = ½(F_L + F_R) − ½·c·g_face·(P_R − P_L)`，`c = max(|u^j_L|, |u^j_R|)`。

use ndarray::Axis;
use rayon::prelude::*;

use super::muscl::reconstruct_face;
use super::traits::{FaceFluxes, FluxScheme};
use crate::geometry::Geometry;
use crate::state::FluidState;
use gr_config::SlopeLimiter;
use gr_foundation::constants::vars;
use gr_foundation::{GrError, GrResult, ZoneIndex};

/// 感应方程通量
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InductionFlux {
    limiter: SlopeLimiter,
}

impl InductionFlux {
    /// 指定斜率限制器
    pub fn new(limiter: SlopeLimiter) -> Self {
        Self { limiter }
    }

    /// 斜率限制器
    #[inline]
    pub fn limiter(&self) -> SlopeLimiter {
        self.limiter
    }

    /// 重构区块下侧面两侧的全部变量
    fn reconstruct(
        &self,
        prim: &FluidState,
        zone: ZoneIndex,
        axis: usize,
        left: &mut [f64],
        right: &mut [f64],
    ) {
        let w = self.stencil_width();
        let im1 = zone.minus(axis, 1).unwrap_or(zone);
        let im2 = zone.minus(axis, w).unwrap_or(im1);
        let ip1 = if w > 1 { zone.plus(axis, 1) } else { zone };
        for v in 0..left.len() {
            let (l, r) = reconstruct_face(
                [prim.get(v, im2), prim.get(v, im1), prim.get(v, zone), prim.get(v, ip1)],
                self.limiter,
            );
            left[v] = l;
            right[v] = r;
        }
    }
}

/// 单侧物理通量
#[inline]
fn physical_flux(axis: usize, g: f64, p: &[f64], out: &mut [f64]) {
    let u_normal = p[vars::velocity(axis)];
    let b_normal = p[vars::field(axis)];
    for (v, f) in out.iter_mut().enumerate() {
        *f = if vars::is_field(v) {
            let component = v - vars::B1;
            g * (u_normal * p[v] - p[vars::velocity(component)] * b_normal)
        } else {
            g * u_normal * p[v]
        };
    }
}

/// Rusanov 数值通量
#[inline]
fn rusanov(axis: usize, g: f64, left: &[f64], right: &[f64], scratch: &mut [f64], out: &mut [f64]) {
    let c = left[vars::velocity(axis)]
        .abs()
        .max(right[vars::velocity(axis)].abs());
    physical_flux(axis, g, left, out);
    physical_flux(axis, g, right, scratch);
    for v in 0..out.len() {
        out[v] = 0.5 * (out[v] + scratch[v]) - 0.5 * c * g * (right[v] - left[v]);
    }
}

impl FluxScheme for InductionFlux {
    fn name(&self) -> &str {
        "induction-rusanov"
    }

    fn stencil_width(&self) -> usize {
        self.limiter.stencil_width()
    }

    fn face_fluxes(
        &self,
        geometry: &Geometry,
        prim: &FluidState,
        fluxes: &mut FaceFluxes,
    ) -> GrResult<()> {
        let grid = geometry.grid();
        prim.check_grid(grid)?;
        if prim.num_vars() < vars::MIN_VARS {
            return Err(GrError::invalid_parameter(format!(
                "感应通量需要至少 {} 个变量，当前 {}",
                vars::MIN_VARS,
                prim.num_vars()
            )));
        }
        let w = self.stencil_width();
        for axis in 0..grid.dim() {
            if grid.ghost(axis) < w {
                return Err(GrError::not_ready(format!(
                    "{} 需要 X{} 方向至少 {} 层 ghost",
                    self.name(),
                    axis + 1,
                    w
                )));
            }
        }

        fluxes.clear();
        let num_vars = prim.num_vars();
        let n_total = grid.n_total();
        let metric = geometry.metric();

        for axis in 0..grid.dim() {
            let (lo, hi) = (w, n_total[axis] - w);
            fluxes
                .axis_mut(axis)
                .vars_mut()
                .axis_iter_mut(Axis(1))
                .into_par_iter()
                .enumerate()
                .for_each(|(k, mut slab)| {
                    let mut left = vec![0.0; num_vars];
                    let mut right = vec![0.0; num_vars];
                    let mut scratch = vec![0.0; num_vars];
                    let mut flux = vec![0.0; num_vars];
                    for j in 0..n_total[1] {
                        for i in 0..n_total[0] {
                            let zone = ZoneIndex::new(i, j, k);
                            let idx = zone.along(axis);
                            if idx < lo || idx > hi {
                                continue;
                            }
                            let Some(below) = zone.minus(axis, 1) else {
                                continue;
                            };
                            self.reconstruct(prim, zone, axis, &mut left, &mut right);
                            let g_face = 0.5 * (metric[zone.kji()].g + metric[below.kji()].g);
                            rusanov(axis, g_face, &left, &right, &mut scratch, &mut flux);
                            for (v, &f) in flux.iter().enumerate() {
                                slab[[v, j, i]] = f;
                            }
                        }
                    }
                });
        }
        Ok(())
    }
}
