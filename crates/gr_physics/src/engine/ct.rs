// crates/gr_physics/src/engine/ct.rs

//! 约束输运 (flux-CT)
//!
//! 棱心 EMF 取相邻四个面心感应通量的算术平均，再用 EMF 重写磁场通量，
//! 使角点离散散度在更新中精确保持。
//!
//! 以循环三元组 (c, a, b) ∈ {(0,1,2), (1,2,0), (2,0,1)} 表示：
//!
//! ```text
//! emf_c(idx) = ¼ (F_a[B_b](idx) + F_a[B_b](idx − e_b) − F_b[B_a](idx) − F_b[B_a](idx − e_a))
//! F_a[B_b](idx) =  ½ (emf_c(idx) + emf_c(idx + e_b))
//! F_b[B_a](idx) = −½ (emf_c(idx) + emf_c(idx + e_a))
//! F_a[B_a]      = 0
//! ```
//!
//! 只有 a、b 两个方向都活跃时 emf_c 才参与计算。

use ndarray::{Array3, Axis, Zip};
use rayon::prelude::*;

use crate::grid::CoordinateGrid;
use crate::schemes::FaceFluxes;
use crate::state::FluidState;
use gr_foundation::constants::vars;
use gr_foundation::ZoneIndex;

/// emf_c 的横向方向 (a, b)
#[inline]
const fn transverse(c: usize) -> (usize, usize) {
    ((c + 1) % 3, (c + 2) % 3)
}

/// 棱心电动势 emf1, emf2, emf3
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEmf {
    emf: [Array3<f64>; 3],
    active: [bool; 3],
}

impl EdgeEmf {
    /// 按网格创建
    pub fn new(grid: &CoordinateGrid) -> Self {
        let shape = grid.shape();
        let mut active = [false; 3];
        for (c, flag) in active.iter_mut().enumerate() {
            let (a, b) = transverse(c);
            *flag = grid.is_active(a) && grid.is_active(b);
        }
        Self {
            emf: [Array3::zeros(shape), Array3::zeros(shape), Array3::zeros(shape)],
            active,
        }
    }

    /// emf_c 是否参与计算
    #[inline]
    pub fn is_active(&self, c: usize) -> bool {
        self.active[c]
    }

    /// emf_c 数组 (k, j, i)
    #[inline]
    pub fn component(&self, c: usize) -> &Array3<f64> {
        &self.emf[c]
    }

    /// 由面通量计算全部活跃 EMF
    pub fn compute(&mut self, fluxes: &FaceFluxes) {
        for c in 0..3 {
            if !self.active[c] {
                continue;
            }
            let (a, b) = transverse(c);
            let f_ab = fluxes.axis(a).var(vars::field(b));
            let f_ba = fluxes.axis(b).var(vars::field(a));

            Zip::indexed(&mut self.emf[c]).par_for_each(|(k, j, i), e| {
                let zone = ZoneIndex::new(i, j, k);
                *e = match (zone.minus(b, 1), zone.minus(a, 1)) {
                    (Some(below_b), Some(below_a)) => {
                        0.25 * (f_ab[zone.kji()] + f_ab[below_b.kji()]
                            - f_ba[zone.kji()]
                            - f_ba[below_a.kji()])
                    }
                    _ => 0.0,
                };
            });
        }
    }

    /// 用 EMF 重写磁场通量
    pub fn replace_fluxes(&self, grid: &CoordinateGrid, fluxes: &mut FaceFluxes) {
        let n_total = grid.n_total();
        for axis in 0..grid.dim() {
            fluxes.axis_mut(axis).var_mut(vars::field(axis)).fill(0.0);
        }

        for c in 0..3 {
            if !self.active[c] {
                continue;
            }
            let (a, b) = transverse(c);
            let emf = &self.emf[c];

            for (axis, field, along, sign) in [(a, b, b, 0.5), (b, a, a, -0.5)] {
                let mut target = fluxes.axis_mut(axis).var_mut(vars::field(field));
                Zip::indexed(&mut target).par_for_each(|(k, j, i), f| {
                    let zone = ZoneIndex::new(i, j, k);
                    let next = zone.plus(along, 1);
                    if next.along(along) < n_total[along] {
                        *f = sign * (emf[zone.kji()] + emf[next.kji()]);
                    }
                });
            }
        }
    }
}

/// 内部区块的守恒量更新
///
/// `out = U_old − dt·div F + dt·S`，磁场变量不加源项。只写内部区块。
pub fn advance_interior(
    grid: &CoordinateGrid,
    cons_old: &FluidState,
    fluxes: &FaceFluxes,
    sources: &FluidState,
    dt: f64,
    out: &mut FluidState,
) {
    let interior = grid.interior();
    let dim = grid.dim();
    let dx = grid.dx();

    out.vars_mut()
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(v, mut field)| {
            let with_source = !vars::is_field(v);
            for zone in interior.iter() {
                let mut div = 0.0;
                for axis in 0..dim {
                    let upper = fluxes.get(axis, v, zone.plus(axis, 1));
                    let lower = fluxes.get(axis, v, zone);
                    div += (upper - lower) / dx[axis];
                }
                let source = if with_source { sources.get(v, zone) } else { 0.0 };
                field[zone.kji()] = cons_old.get(v, zone) - dt * div + dt * source;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2d() -> CoordinateGrid {
        CoordinateGrid::new([4, 4, 1], 2, 2, [0.0; 3], [1.0; 3]).unwrap()
    }

    #[test]
    fn test_active_edges_follow_dimension() {
        let emf = EdgeEmf::new(&grid_2d());
        assert!(!emf.is_active(0));
        assert!(!emf.is_active(1));
        assert!(emf.is_active(2));
        assert_eq!(transverse(0), (1, 2));
        assert_eq!(transverse(2), (0, 1));
    }

    #[test]
    fn test_emf_average_and_replacement() {
        let grid = grid_2d();
        let mut fluxes = FaceFluxes::new(8, &grid);
        // F1[B2] = 1，F2[B1] = -1 → emf3 = ¼(1 + 1 + 1 + 1) = 1
        fluxes.axis_mut(0).var_mut(vars::B2).fill(1.0);
        fluxes.axis_mut(1).var_mut(vars::B1).fill(-1.0);
        fluxes.axis_mut(0).var_mut(vars::B1).fill(5.0);

        let mut emf = EdgeEmf::new(&grid);
        emf.compute(&fluxes);
        let zone = ZoneIndex::new(3, 3, 0);
        assert!((emf.component(2)[zone.kji()] - 1.0).abs() < 1e-15);
        assert_eq!(emf.component(2)[[0, 0, 3]], 0.0);

        emf.replace_fluxes(&grid, &mut fluxes);
        assert_eq!(fluxes.get(0, vars::B1, zone), 0.0);
        assert!((fluxes.get(0, vars::B2, zone) - 1.0).abs() < 1e-15);
        assert!((fluxes.get(1, vars::B1, zone) + 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_advance_uniform_flux_keeps_state() {
        let grid = grid_2d();
        let mut cons = FluidState::new(8, &grid);
        cons.vars_mut().fill(2.0);
        let mut fluxes = FaceFluxes::new(8, &grid);
        fluxes.axis_mut(0).vars_mut().fill(3.0);
        let mut sources = cons.clone_structure();
        sources.vars_mut().fill(1.0);
        let mut out = cons.clone_structure();
        advance_interior(&grid, &cons, &fluxes, &sources, 0.1, &mut out);

        let zone = ZoneIndex::new(2, 4, 0);
        assert!((out.get(vars::RHO, zone) - 2.1).abs() < 1e-14);
        // 磁场不加源项
        assert!((out.get(vars::B1, zone) - 2.0).abs() < 1e-14);
        // ghost 不写入
        assert_eq!(out.get(vars::RHO, ZoneIndex::new(0, 0, 0)), 0.0);
    }
}
