// crates/gr_physics/tests/geometry_flat.rs

//! 平直时空几何测试
//!
//! 8³ 网格、3 层 ghost：度规在每个区块（含 ghost）上都是 Minkowski，
//! 联络系数恒为零，两种差分模板结果一致。

use gr_config::SpacetimeKind;
use gr_foundation::tensor::{MINKOWSKI, ZERO3};
use gr_foundation::ZoneIndex;
use gr_physics::{ConnectionStencil, CoordinateGrid, Geometry, GeometryParameters, Location};

// ============================================================================
// 测试辅助函数
// ============================================================================

fn flat_geometry() -> Geometry {
    let grid = CoordinateGrid::new([8, 8, 8], 3, 3, [0.0; 3], [1.0; 3]).unwrap();
    Geometry::build(grid, SpacetimeKind::Flat, GeometryParameters::flat()).unwrap()
}

// ============================================================================
// 度规
// ============================================================================

#[test]
fn test_minkowski_everywhere() {
    let geom = flat_geometry();
    assert_eq!(geom.grid().n_total(), [14, 14, 14]);
    for zone in geom.grid().full().iter() {
        let m = geom.metric_at(zone);
        assert_eq!(m.gcov[0][0], -1.0);
        assert_eq!(m.gcov, MINKOWSKI);
        assert_eq!(m.gcon, MINKOWSKI);
        assert_eq!(m.g, 1.0);
        assert_eq!(m.alpha, 1.0);
    }
}

#[test]
fn test_physical_coordinates_are_logical() {
    let geom = flat_geometry();
    let [x, y, z] = geom.physical_coords();
    let zone = ZoneIndex::new(0, 5, 13);
    let logical = geom.grid().x_at(zone, Location::Center);
    assert_eq!(x[zone.kji()], logical[0]);
    assert_eq!(y[zone.kji()], logical[1]);
    assert_eq!(z[zone.kji()], logical[2]);
    assert!((logical[0] + 0.3125).abs() < 1e-15);

    let back = geom.to_logical(geom.to_physical(logical)).unwrap();
    for a in 0..3 {
        assert!((back[a] - logical[a]).abs() < 1e-15);
    }
}

#[test]
fn test_g_field_is_unity() {
    let geom = flat_geometry();
    let g = geom.g_field();
    assert_eq!(g.dim(), (14, 14, 14));
    assert!(g.iter().all(|&v| v == 1.0));
}

// ============================================================================
// 联络系数
// ============================================================================

#[test]
fn test_connection_vanishes() {
    for stencil in [ConnectionStencil::Perturbed, ConnectionStencil::Neighbor] {
        let mut geom = flat_geometry();
        geom.compute_connection_coefficients(stencil).unwrap();
        for zone in geom.grid().full().iter() {
            assert_eq!(*geom.connection_at(zone).unwrap(), ZERO3);
        }
    }
}

#[test]
fn test_connection_computed_once() {
    let mut geom = flat_geometry();
    geom.compute_connection_coefficients(ConnectionStencil::Perturbed)
        .unwrap();
    // 第二次调用直接返回
    geom.compute_connection_coefficients(ConnectionStencil::Neighbor)
        .unwrap();
    assert!(geom.has_connection());
}

#[test]
fn test_collapsed_axes_have_no_ghosts() {
    let grid = CoordinateGrid::new([16, 1, 1], 1, 3, [0.0; 3], [1.0; 3]).unwrap();
    let geom = Geometry::build(grid, SpacetimeKind::Flat, GeometryParameters::flat()).unwrap();
    assert_eq!(geom.grid().n_total(), [22, 1, 1]);
    assert_eq!(geom.metric().dim(), (1, 1, 22));
    assert_eq!(geom.horizon_radius(), 0.0);
}
