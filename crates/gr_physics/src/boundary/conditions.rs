// crates/gr_physics/src/boundary/conditions.rs

//! 物理边界条件
//!
//! 每个面一种边界类型，解析为 ghost 区填充规则：
//!
//! | 类型 | 下侧 ghost g-1-m 的来源 | 上侧 ghost g+N+m 的来源 |
//! |------|------------------------|------------------------|
//! | Periodic | g+N-1-m | g+m |
//! | Outflow / NoInflow | g | g+N-1 |
//! | Reflecting | g+m | g+N-1-m |
//!
//! Reflecting 对法向速度与法向磁场取反；NoInflow 把指向域内的法向速度置零。
//! 周期面由 halo 交换填充，这里跳过。各面按 X1、X2、X3 顺序在完整横向范围上
//! 填充，角点 ghost 因此与相邻面一致。

use ndarray::{ArrayViewMut3, Axis};
use rayon::prelude::*;

use crate::grid::CoordinateGrid;
use crate::state::FluidState;
use gr_config::{BoundaryConfig, BoundaryKind, Face};
use gr_foundation::constants::vars;
use gr_foundation::{GrError, GrResult};

/// 六个面的边界条件
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryConditions {
    kinds: BoundaryConfig,
}

impl BoundaryConditions {
    /// 由配置创建
    pub fn new(kinds: BoundaryConfig) -> Self {
        Self { kinds }
    }

    /// 所有面使用同一类型
    pub fn uniform(kind: BoundaryKind) -> Self {
        Self::new(BoundaryConfig::uniform(kind))
    }

    /// 某个面的边界类型
    #[inline]
    pub fn kind(&self, face: Face) -> BoundaryKind {
        self.kinds.kind(face)
    }

    /// 边界配置
    #[inline]
    pub fn config(&self) -> &BoundaryConfig {
        &self.kinds
    }

    /// 检查与网格的兼容性
    pub fn validate(&self, grid: &CoordinateGrid) -> GrResult<()> {
        for axis in 0..grid.dim() {
            let lower = self.kind(Face::from_axis(axis, false));
            let upper = self.kind(Face::from_axis(axis, true));
            if lower.is_periodic() != upper.is_periodic() {
                return Err(GrError::invalid_parameter(format!(
                    "X{} 方向周期边界未成对: {} / {}",
                    axis + 1,
                    lower,
                    upper
                )));
            }
            let needs_depth = [lower, upper]
                .iter()
                .any(|k| matches!(k, BoundaryKind::Periodic | BoundaryKind::Reflecting));
            if needs_depth && grid.n()[axis] < grid.ghost(axis) {
                return Err(GrError::invalid_grid(format!(
                    "X{} 方向内部区块数 {} 少于 ghost 宽度 {}，无法回绕或镜像",
                    axis + 1,
                    grid.n()[axis],
                    grid.ghost(axis)
                )));
            }
        }
        Ok(())
    }

    /// 填充位于全局计算域边缘的非周期面
    pub fn apply(&self, grid: &CoordinateGrid, state: &mut FluidState) -> GrResult<()> {
        state.check_grid(grid)?;
        for axis in 0..grid.dim() {
            for upper in [false, true] {
                let face = Face::from_axis(axis, upper);
                let kind = self.kind(face);
                if kind.is_periodic() || !grid.topology().on_domain_edge(face) {
                    continue;
                }
                fill_face(grid, state, face, kind);
            }
        }
        Ok(())
    }
}

/// 按边界类型填充一个面的全部 ghost 层
pub(crate) fn fill_face(grid: &CoordinateGrid, state: &mut FluidState, face: Face, kind: BoundaryKind) {
    let axis = face.axis();
    let g = grid.ghost(axis);
    let n = grid.n()[axis];
    if g == 0 {
        return;
    }
    // 存储顺序 (k, j, i)：X1 → Axis(2)
    let storage_axis = Axis(2 - axis);
    let upper = face.is_upper();

    state
        .vars_mut()
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(v, mut field)| {
            for m in 0..g {
                let (dst, src) = ghost_source(kind, upper, g, n, m);
                copy_layer(&mut field, storage_axis, src, dst);
                let mut layer = field.index_axis_mut(storage_axis, dst);

                let normal = v == vars::velocity(axis) || v == vars::field(axis);
                match kind {
                    BoundaryKind::Reflecting if normal => layer.mapv_inplace(|x| -x),
                    BoundaryKind::NoInflow if v == vars::velocity(axis) => {
                        if upper {
                            layer.mapv_inplace(|u| u.max(0.0));
                        } else {
                            layer.mapv_inplace(|u| u.min(0.0));
                        }
                    }
                    _ => {}
                }
            }
        });
}

/// 第 m 层 ghost 的 (目标, 来源) 索引
#[inline]
fn ghost_source(kind: BoundaryKind, upper: bool, g: usize, n: usize, m: usize) -> (usize, usize) {
    if upper {
        let dst = g + n + m;
        let src = match kind {
            BoundaryKind::Periodic => g + m,
            BoundaryKind::Outflow | BoundaryKind::NoInflow => g + n - 1,
            BoundaryKind::Reflecting => g + n - 1 - m,
        };
        (dst, src)
    } else {
        let dst = g - 1 - m;
        let src = match kind {
            BoundaryKind::Periodic => g + n - 1 - m,
            BoundaryKind::Outflow | BoundaryKind::NoInflow => g,
            BoundaryKind::Reflecting => g + m,
        };
        (dst, src)
    }
}

#[inline]
fn copy_layer(field: &mut ArrayViewMut3<'_, f64>, axis: Axis, src: usize, dst: usize) {
    let source = field.index_axis(axis, src).to_owned();
    field.index_axis_mut(axis, dst).assign(&source);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gr_foundation::ZoneIndex;

    fn grid_1d() -> CoordinateGrid {
        CoordinateGrid::new([4, 1, 1], 1, 2, [0.0; 3], [1.0; 3]).unwrap()
    }

    fn ramp(grid: &CoordinateGrid) -> FluidState {
        let mut state = FluidState::new(8, grid);
        for i in 0..grid.n_total()[0] {
            for v in 0..8 {
                state.set(v, ZoneIndex::new(i, 0, 0), (i * 10 + v) as f64);
            }
        }
        state
    }

    #[test]
    fn test_ghost_source_table() {
        assert_eq!(ghost_source(BoundaryKind::Periodic, false, 3, 8, 0), (2, 10));
        assert_eq!(ghost_source(BoundaryKind::Periodic, true, 3, 8, 2), (13, 5));
        assert_eq!(ghost_source(BoundaryKind::Reflecting, false, 3, 8, 1), (1, 4));
        assert_eq!(ghost_source(BoundaryKind::Outflow, true, 3, 8, 2), (13, 10));
    }

    #[test]
    fn test_outflow_copies_nearest_interior() {
        let grid = grid_1d();
        let mut state = ramp(&grid);
        BoundaryConditions::uniform(BoundaryKind::Outflow)
            .apply(&grid, &mut state)
            .unwrap();
        for v in 0..8 {
            assert_eq!(state.get(v, ZoneIndex::new(0, 0, 0)), state.get(v, ZoneIndex::new(2, 0, 0)));
            assert_eq!(state.get(v, ZoneIndex::new(7, 0, 0)), state.get(v, ZoneIndex::new(5, 0, 0)));
        }
    }

    #[test]
    fn test_reflecting_flips_normal_components() {
        let grid = grid_1d();
        let mut state = ramp(&grid);
        BoundaryConditions::uniform(BoundaryKind::Reflecting)
            .apply(&grid, &mut state)
            .unwrap();
        let ghost = ZoneIndex::new(1, 0, 0);
        let mirror = ZoneIndex::new(2, 0, 0);
        assert_eq!(state.get(vars::RHO, ghost), state.get(vars::RHO, mirror));
        assert_eq!(state.get(vars::U1, ghost), -state.get(vars::U1, mirror));
        assert_eq!(state.get(vars::B1, ghost), -state.get(vars::B1, mirror));
        assert_eq!(state.get(vars::U2, ghost), state.get(vars::U2, mirror));
    }

    #[test]
    fn test_no_inflow_clamps_normal_velocity() {
        let grid = grid_1d();
        let mut state = FluidState::new(8, &grid);
        state.set(vars::U1, ZoneIndex::new(2, 0, 0), 0.5);
        state.set(vars::U1, ZoneIndex::new(5, 0, 0), 0.5);
        BoundaryConditions::uniform(BoundaryKind::NoInflow)
            .apply(&grid, &mut state)
            .unwrap();
        // 下侧正速度指向域内，置零；上侧正速度指向域外，保留
        assert_eq!(state.get(vars::U1, ZoneIndex::new(0, 0, 0)), 0.0);
        assert_eq!(state.get(vars::U1, ZoneIndex::new(7, 0, 0)), 0.5);
    }

    #[test]
    fn test_validate_rejects_unpaired_periodic() {
        let grid = grid_1d();
        let mut config = BoundaryConfig::uniform(BoundaryKind::Periodic);
        config.set(Face::X1Upper, BoundaryKind::Outflow);
        assert!(BoundaryConditions::new(config).validate(&grid).is_err());
        // 塌缩方向不检查
        let mut config = BoundaryConfig::uniform(BoundaryKind::Outflow);
        config.set(Face::X2Upper, BoundaryKind::Periodic);
        assert!(BoundaryConditions::new(config).validate(&grid).is_ok());
    }
}
