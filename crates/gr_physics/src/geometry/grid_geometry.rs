// crates/gr_physics/src/geometry/grid_geometry.rs

//! 网格几何
//!
//! 在每个区块（含 ghost 层）上缓存度规量与联络系数。构建一次后只读，
//! 可在 rayon 线程间共享。
//!
//! # 生命周期
//!
//! 1. [`Geometry::build`]: 检查参数，逐区块并行计算度规
//! 2. [`Geometry::compute_connection_coefficients`]: 一次性原地计算 Γ
//! 3. 之后只通过 `metric_at` / `connection_at` 读取

use ndarray::{Array3, Zip};
use rayon::prelude::*;
use tracing::{debug, info};

use super::connection::{centered_difference, christoffel, Connection, ConnectionStencil};
use super::metric::MetricField;
use super::spacetime::{horizon_radius, GeometryParameters, SpacetimeMap};
use crate::grid::{CoordinateGrid, Location};
use gr_config::SpacetimeKind;
use gr_foundation::constants::tolerances;
use gr_foundation::tensor::{Tensor2, ZERO2, ZERO3};
use gr_foundation::{GrError, GrResult, ZoneIndex};

/// 网格几何
#[derive(Debug, Clone)]
pub struct Geometry {
    grid: CoordinateGrid,
    map: SpacetimeMap,
    x_coords: [Array3<f64>; 3],
    metric: Array3<MetricField>,
    connection: Option<Array3<Connection>>,
}

impl Geometry {
    /// 构建几何
    ///
    /// # 错误
    ///
    /// - `InvalidParameter`: MKS 自旋 |a| >= 1、h 不在 (0, 1]、X2 范围触及极点，
    ///   或内部区块中心位于视界内
    /// - `SingularMetric`: 某区块度规不可逆
    pub fn build(
        grid: CoordinateGrid,
        kind: SpacetimeKind,
        params: GeometryParameters,
    ) -> GrResult<Self> {
        let map = SpacetimeMap::new(kind, params)?;
        if kind == SpacetimeKind::ModifiedKerrSchild {
            Self::check_horizon(&grid, &map)?;
            Self::check_poles(&grid)?;
        }

        let x_coords = Self::physical_coordinates(&grid, &map);
        let metric = Self::evaluate_metric(&grid, &map)?;

        info!(
            "几何构建完成: {}, 网格 {:?} (含 ghost {:?}), a = {}, h = {}",
            kind,
            grid.n(),
            grid.n_total(),
            params.black_hole_spin,
            params.h_slope
        );

        Ok(Self {
            grid,
            map,
            x_coords,
            metric,
            connection: None,
        })
    }

    /// 只有 ghost 层可以伸入视界
    fn check_horizon(grid: &CoordinateGrid, map: &SpacetimeMap) -> GrResult<()> {
        let r_horizon = horizon_radius(map.params().black_hole_spin);
        let first = grid.interior().lo[0];
        let r_inner = grid.coord(0, first, Location::Center).exp();
        if r_inner <= r_horizon {
            return Err(GrError::invalid_parameter(format!(
                "内部区块 r = {:.6} 位于视界 r+ = {:.6} 之内",
                r_inner, r_horizon
            )));
        }
        Ok(())
    }

    /// X2 计算域必须严格位于 (0, 1) 内；ghost 层可以越过极点
    fn check_poles(grid: &CoordinateGrid) -> GrResult<()> {
        let (start, end) = (grid.start()[1], grid.end()[1]);
        if start <= 0.0 || end >= 1.0 {
            return Err(GrError::invalid_parameter(format!(
                "X2 范围 [{}, {}] 必须严格位于 (0, 1) 内",
                start, end
            )));
        }
        if grid.ghost(1) > 0 {
            debug!(
                "X2 ghost 层越过极点时依赖 sin θ 下限 {:e}",
                tolerances::SIN_THETA_FLOOR
            );
        }
        Ok(())
    }

    fn physical_coordinates(grid: &CoordinateGrid, map: &SpacetimeMap) -> [Array3<f64>; 3] {
        let [x1, x2, x3] = grid.coords(Location::Center);
        let shape = grid.shape();
        let mut r = Array3::zeros(shape);
        let mut theta = Array3::zeros(shape);
        let mut phi = Array3::zeros(shape);

        Zip::from(&mut r)
            .and(&mut theta)
            .and(&mut phi)
            .and(&x1)
            .and(&x2)
            .and(&x3)
            .par_for_each(|r, theta, phi, &a, &b, &c| {
                let xp = map.to_physical([a, b, c]);
                *r = xp[0];
                *theta = xp[1];
                *phi = xp[2];
            });
        [r, theta, phi]
    }

    fn evaluate_metric(grid: &CoordinateGrid, map: &SpacetimeMap) -> GrResult<Array3<MetricField>> {
        let shape = grid.shape();
        let (n3, n2, n1) = shape;

        let zones = (0..n3 * n2 * n1)
            .into_par_iter()
            .map(|flat| {
                let zone = ZoneIndex::new(flat % n1, (flat / n1) % n2, flat / (n1 * n2));
                match map.kind() {
                    SpacetimeKind::Flat => Ok(MetricField::minkowski()),
                    SpacetimeKind::ModifiedKerrSchild => {
                        MetricField::from_gcov(map.gcov(grid.x_at(zone, Location::Center)), zone)
                    }
                }
            })
            .collect::<GrResult<Vec<_>>>()?;

        Array3::from_shape_vec(shape, zones).map_err(|e| GrError::invalid_grid(e.to_string()))
    }

    // ========================================================================
    // 联络系数
    // ========================================================================

    /// 一次性原地计算全部区块的联络系数
    ///
    /// 已计算过时直接返回。`Neighbor` 模板在活跃方向没有 ghost 层时返回 `NotReady`。
    pub fn compute_connection_coefficients(&mut self, stencil: ConnectionStencil) -> GrResult<()> {
        if self.connection.is_some() {
            debug!("联络系数已存在，跳过重复计算");
            return Ok(());
        }

        let shape = self.grid.shape();
        let mut gamma = Array3::from_elem(shape, ZERO3);

        if self.map.kind() != SpacetimeKind::Flat {
            match stencil {
                ConnectionStencil::Perturbed => self.fill_perturbed(&mut gamma),
                ConnectionStencil::Neighbor => self.fill_neighbor(&mut gamma)?,
            }
        } else if stencil == ConnectionStencil::Neighbor {
            self.check_neighbor_halo()?;
        }

        info!("联络系数计算完成 ({:?} 模板)", stencil);
        self.connection = Some(gamma);
        Ok(())
    }

    fn check_neighbor_halo(&self) -> GrResult<()> {
        for axis in 0..self.grid.dim() {
            if self.grid.ghost(axis) == 0 {
                return Err(GrError::not_ready(format!(
                    "邻区差分需要 X{} 方向至少 1 层 ghost",
                    axis + 1
                )));
            }
        }
        Ok(())
    }

    /// 在 X ± δ e_a 处的解析度规导数
    fn perturbed_derivative(map: &SpacetimeMap, x: [f64; 3], axis: usize) -> Tensor2 {
        let delta = tolerances::CONNECTION_DELTA;
        let mut plus = x;
        let mut minus = x;
        plus[axis] += delta;
        minus[axis] -= delta;
        centered_difference(&map.gcov(plus), &map.gcov(minus), delta)
    }

    fn fill_perturbed(&self, gamma: &mut Array3<Connection>) {
        let grid = &self.grid;
        let map = &self.map;
        Zip::indexed(gamma)
            .and(&self.metric)
            .par_for_each(|(k, j, i), gamma, metric| {
                let x = grid.x_at(ZoneIndex::new(i, j, k), Location::Center);
                let mut dg = [ZERO2; 4];
                for axis in 0..3 {
                    dg[axis + 1] = Self::perturbed_derivative(map, x, axis);
                }
                *gamma = christoffel(&metric.gcon, &dg);
            });
    }

    fn fill_neighbor(&self, gamma: &mut Array3<Connection>) -> GrResult<()> {
        self.check_neighbor_halo()?;

        let grid = &self.grid;
        let map = &self.map;
        let metric = &self.metric;
        let n_total = grid.n_total();
        let dx = grid.dx();

        Zip::indexed(gamma).par_for_each(|(k, j, i), gamma| {
            let zone = ZoneIndex::new(i, j, k);
            let idx = [i, j, k];
            // 活跃方向的最外层 ghost 没有外侧邻居
            let interior_of_halo =
                (0..grid.dim()).all(|a| idx[a] >= 1 && idx[a] + 1 < n_total[a]);
            if !interior_of_halo {
                return;
            }

            let x = grid.x_at(zone, Location::Center);
            let mut dg = [ZERO2; 4];
            for axis in 0..3 {
                dg[axis + 1] = if grid.is_active(axis) {
                    let mut plus = idx;
                    let mut minus = idx;
                    plus[axis] += 1;
                    minus[axis] -= 1;
                    centered_difference(
                        &metric[[plus[2], plus[1], plus[0]]].gcov,
                        &metric[[minus[2], minus[1], minus[0]]].gcov,
                        dx[axis],
                    )
                } else {
                    Self::perturbed_derivative(map, x, axis)
                };
            }
            *gamma = christoffel(&metric[[k, j, i]].gcon, &dg);
        });
        Ok(())
    }

    // ========================================================================
    // 访问
    // ========================================================================

    /// 区块度规（O(1) 缓存查找）
    ///
    /// 索引越界时 panic（ndarray 边界检查）。
    #[inline]
    pub fn metric_at(&self, zone: ZoneIndex) -> &MetricField {
        &self.metric[zone.kji()]
    }

    /// 度规缓存
    #[inline]
    pub fn metric(&self) -> &Array3<MetricField> {
        &self.metric
    }

    /// 区块联络系数
    pub fn connection_at(&self, zone: ZoneIndex) -> GrResult<&Connection> {
        let gamma = self
            .connection
            .as_ref()
            .ok_or_else(|| GrError::not_ready("联络系数尚未计算"))?;
        gamma
            .get(zone.kji())
            .ok_or_else(|| GrError::not_ready(format!("区块 {} 超出几何范围", zone)))
    }

    /// 联络系数是否已计算
    #[inline]
    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    /// 每个区块的 sqrt(-g)
    pub fn g_field(&self) -> Array3<f64> {
        self.metric.mapv(|m| m.g)
    }

    /// 物理坐标数组 [r, θ, φ]（平直时空为 [x, y, z]）
    #[inline]
    pub fn physical_coords(&self) -> &[Array3<f64>; 3] {
        &self.x_coords
    }

    /// 逻辑坐标 → 物理坐标
    #[inline]
    pub fn to_physical(&self, x: [f64; 3]) -> [f64; 3] {
        self.map.to_physical(x)
    }

    /// 物理坐标 → 逻辑坐标
    #[inline]
    pub fn to_logical(&self, xp: [f64; 3]) -> GrResult<[f64; 3]> {
        self.map.to_logical(xp)
    }

    /// 时空类型
    #[inline]
    pub fn kind(&self) -> SpacetimeKind {
        self.map.kind()
    }

    /// 时空参数
    #[inline]
    pub fn params(&self) -> GeometryParameters {
        self.map.params()
    }

    /// 解析映射
    #[inline]
    pub fn map(&self) -> &SpacetimeMap {
        &self.map
    }

    /// 坐标网格
    #[inline]
    pub fn grid(&self) -> &CoordinateGrid {
        &self.grid
    }

    /// 内部网格数 [N1, N2, N3]
    #[inline]
    pub fn n(&self) -> [usize; 3] {
        self.grid.n()
    }

    /// 空间维数
    #[inline]
    pub fn dim(&self) -> usize {
        self.grid.dim()
    }

    /// ghost 层宽度
    #[inline]
    pub fn num_ghost(&self) -> usize {
        self.grid.num_ghost()
    }

    /// 外视界半径（平直时空返回 0）
    pub fn horizon_radius(&self) -> f64 {
        match self.kind() {
            SpacetimeKind::Flat => 0.0,
            SpacetimeKind::ModifiedKerrSchild => horizon_radius(self.params().black_hole_spin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_geometry(ng: usize) -> Geometry {
        let grid = CoordinateGrid::new([4, 4, 1], 2, ng, [0.0; 3], [1.0; 3]).unwrap();
        Geometry::build(grid, SpacetimeKind::Flat, GeometryParameters::flat()).unwrap()
    }

    #[test]
    fn test_connection_not_ready_before_compute() {
        let geom = flat_geometry(2);
        assert!(matches!(
            geom.connection_at(ZoneIndex::new(2, 2, 0)),
            Err(GrError::NotReady { .. })
        ));
    }

    #[test]
    fn test_neighbor_stencil_requires_halo() {
        let mut geom = flat_geometry(0);
        assert!(matches!(
            geom.compute_connection_coefficients(ConnectionStencil::Neighbor),
            Err(GrError::NotReady { .. })
        ));
        assert!(!geom.has_connection());
        assert!(geom
            .compute_connection_coefficients(ConnectionStencil::Perturbed)
            .is_ok());
    }

    #[test]
    fn test_connection_out_of_range() {
        let mut geom = flat_geometry(1);
        geom.compute_connection_coefficients(ConnectionStencil::Perturbed)
            .unwrap();
        assert!(geom.connection_at(ZoneIndex::new(99, 0, 0)).is_err());
    }

    #[test]
    fn test_flat_horizon_radius() {
        assert_eq!(flat_geometry(1).horizon_radius(), 0.0);
    }
}
