// crates/gr_physics/src/schemes/recovery.rs

//! 参考原始量恢复：按 sqrt(-g) 加权
//!
//! `U = g·P`，`P = U / g`。

use ndarray::{s, Zip};

use super::traits::{PrimitiveRecovery, RecoveryFailure};
use crate::geometry::Geometry;
use crate::grid::ZoneBox;
use crate::state::FluidState;
use gr_foundation::GrResult;

/// 体积加权恢复
#[derive(Debug, Clone, Copy, Default)]
pub struct DensitizedRecovery;

impl DensitizedRecovery {
    /// 创建
    pub fn new() -> Self {
        Self
    }
}

impl PrimitiveRecovery for DensitizedRecovery {
    fn name(&self) -> &str {
        "densitized"
    }

    fn prim_to_cons(
        &self,
        geometry: &Geometry,
        prim: &FluidState,
        cons: &mut FluidState,
        region: &ZoneBox,
    ) -> GrResult<()> {
        prim.check_grid(geometry.grid())?;
        cons.check_grid(geometry.grid())?;

        let [i0, j0, k0] = region.lo;
        let [i1, j1, k1] = region.hi;
        let metric = geometry.metric().slice(s![k0..k1, j0..j1, i0..i1]);
        let input = prim.vars().slice(s![.., k0..k1, j0..j1, i0..i1]);
        let mut output = cons.vars_mut().slice_mut(s![.., k0..k1, j0..j1, i0..i1]);

        for (mut u, p) in output.outer_iter_mut().zip(input.outer_iter()) {
            Zip::from(&mut u)
                .and(&p)
                .and(&metric)
                .par_for_each(|u, &p, m| *u = m.g * p);
        }
        Ok(())
    }

    fn cons_to_prim(
        &self,
        geometry: &Geometry,
        cons: &FluidState,
        prim: &mut FluidState,
        region: &ZoneBox,
    ) -> Result<(), RecoveryFailure> {
        let [i0, j0, k0] = region.lo;
        let [i1, j1, k1] = region.hi;
        let metric = geometry.metric().slice(s![k0..k1, j0..j1, i0..i1]);
        let input = cons.vars().slice(s![.., k0..k1, j0..j1, i0..i1]);
        let mut output = prim.vars_mut().slice_mut(s![.., k0..k1, j0..j1, i0..i1]);

        for (mut p, u) in output.outer_iter_mut().zip(input.outer_iter()) {
            Zip::from(&mut p)
                .and(&u)
                .and(&metric)
                .par_for_each(|p, &u, m| *p = u / m.g);
        }

        match prim.find_non_finite(region) {
            Some((zone, variable)) => Err(RecoveryFailure { zone, variable }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryParameters;
    use crate::grid::CoordinateGrid;
    use gr_config::SpacetimeKind;
    use gr_foundation::ZoneIndex;

    fn kerr_geometry() -> Geometry {
        let grid = CoordinateGrid::new(
            [8, 8, 1],
            2,
            2,
            [1.0, 0.1, 0.0],
            [2.5, 0.9, 1.0],
        )
        .unwrap();
        Geometry::build(grid, SpacetimeKind::ModifiedKerrSchild, GeometryParameters::new(0.5, 0.3))
            .unwrap()
    }

    #[test]
    fn test_prim_cons_inverse() {
        let geom = kerr_geometry();
        let region = geom.grid().interior();
        let mut prim = FluidState::new(8, geom.grid());
        for zone in region.iter() {
            for v in 0..8 {
                prim.set(v, zone, 1.0 + v as f64 + zone.i as f64 * 0.1);
            }
        }
        let mut cons = prim.clone_structure();
        let recovery = DensitizedRecovery::new();
        recovery.prim_to_cons(&geom, &prim, &mut cons, &region).unwrap();

        let zone = ZoneIndex::new(4, 5, 0);
        let g = geom.metric_at(zone).g;
        assert!((cons.get(3, zone) - g * prim.get(3, zone)).abs() < 1e-12);

        let mut back = prim.clone_structure();
        recovery.cons_to_prim(&geom, &cons, &mut back, &region).unwrap();
        for z in region.iter() {
            for v in 0..8 {
                assert!((back.get(v, z) - prim.get(v, z)).abs() < 1e-12 * prim.get(v, z).abs());
            }
        }
    }

    #[test]
    fn test_non_finite_reports_zone() {
        let geom = kerr_geometry();
        let region = geom.grid().interior();
        let mut cons = FluidState::new(8, geom.grid());
        let bad = ZoneIndex::new(3, 6, 0);
        cons.set(2, bad, f64::NAN);
        let mut prim = cons.clone_structure();
        let err = DensitizedRecovery
            .cons_to_prim(&geom, &cons, &mut prim, &region)
            .unwrap_err();
        assert_eq!(err.zone, bad);
        assert_eq!(err.variable, 2);
    }
}
