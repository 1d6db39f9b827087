// crates/gr_physics/src/boundary/halo.rs

//! Ghost 区交换
//!
//! 步进器只通过 [`HaloExchange`] 请求填充 ghost 层，不关心数据来自同一进程
//! 的周期回绕还是相邻进程。[`SerialExchange`] 只回绕本地区块完整覆盖的周期方向。

use tracing::trace;

use super::conditions::{fill_face, BoundaryConditions};
use crate::grid::CoordinateGrid;
use crate::state::FluidState;
use gr_config::Face;
use gr_foundation::{GrError, GrResult};

/// Ghost 区交换接口
pub trait HaloExchange: Send + Sync {
    /// 实现名称
    fn name(&self) -> &'static str;

    /// 填充与其他区块（本进程或相邻进程）相接的 ghost 层
    ///
    /// 物理边界面由 [`BoundaryConditions::apply`] 处理，不在此填充。
    fn exchange(
        &self,
        grid: &CoordinateGrid,
        boundaries: &BoundaryConditions,
        state: &mut FluidState,
    ) -> GrResult<()>;
}

/// 单进程交换：周期面回绕
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialExchange;

impl HaloExchange for SerialExchange {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn exchange(
        &self,
        grid: &CoordinateGrid,
        boundaries: &BoundaryConditions,
        state: &mut FluidState,
    ) -> GrResult<()> {
        state.check_grid(grid)?;
        for axis in 0..grid.dim() {
            let lower = Face::from_axis(axis, false);
            let upper = Face::from_axis(axis, true);
            let kind = boundaries.kind(lower);
            if !kind.is_periodic() {
                continue;
            }
            if !grid.topology().spans_axis(axis) {
                return Err(GrError::not_ready(format!(
                    "X{} 方向分布在 {} 个进程上，串行交换无法回绕",
                    axis + 1,
                    grid.topology().size()
                )));
            }
            fill_face(grid, state, lower, kind);
            fill_face(grid, state, upper, boundaries.kind(upper));
            trace!("X{} 周期 ghost 已回绕", axis + 1);
        }
        Ok(())
    }
}

/// 先交换再施加物理边界，得到完整的 ghost 层
pub fn sync_ghosts<H: HaloExchange + ?Sized>(
    halo: &H,
    boundaries: &BoundaryConditions,
    grid: &CoordinateGrid,
    state: &mut FluidState,
) -> GrResult<()> {
    halo.exchange(grid, boundaries, state)?;
    boundaries.apply(grid, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ProcessTopology;
    use gr_config::BoundaryKind;
    use gr_foundation::ZoneIndex;

    #[test]
    fn test_periodic_wrap_including_corners() {
        let grid = CoordinateGrid::new([4, 4, 1], 2, 2, [0.0; 3], [1.0; 3]).unwrap();
        let mut state = FluidState::new(8, &grid);
        for zone in grid.interior().iter() {
            state.set(0, zone, (zone.i * 100 + zone.j) as f64);
        }
        let bc = BoundaryConditions::uniform(BoundaryKind::Periodic);
        sync_ghosts(&SerialExchange, &bc, &grid, &mut state).unwrap();

        // i = 0 ↔ i = 4，j = 7 ↔ j = 3
        assert_eq!(state.get(0, ZoneIndex::new(0, 3, 0)), state.get(0, ZoneIndex::new(4, 3, 0)));
        assert_eq!(state.get(0, ZoneIndex::new(0, 7, 0)), state.get(0, ZoneIndex::new(4, 3, 0)));
        assert_eq!(state.get(0, ZoneIndex::new(7, 0, 0)), state.get(0, ZoneIndex::new(3, 4, 0)));
    }

    #[test]
    fn test_serial_exchange_rejects_split_periodic_axis() {
        let topo = ProcessTopology::new(0, 2, Default::default(), [8, 4, 1], [0, 0, 0], [4, 4, 1])
            .unwrap();
        let grid =
            CoordinateGrid::with_topology([8, 4, 1], 2, 2, [0.0; 3], [1.0; 3], topo).unwrap();
        let mut state = FluidState::new(8, &grid);
        let bc = BoundaryConditions::uniform(BoundaryKind::Periodic);
        assert!(matches!(
            SerialExchange.exchange(&grid, &bc, &mut state),
            Err(GrError::NotReady { .. })
        ));
    }
}
