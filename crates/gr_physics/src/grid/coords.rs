// crates/gr_physics/src/grid/coords.rs

//! 逻辑坐标网格
//!
//! 提供每个区块（含 ghost 层）的逻辑坐标 (X1, X2, X3)。
//! 数组按 (k, j, i) 即 (X3, X2, X1) 顺序存储。
//!
//! 只有 `axis < dim` 的方向是活跃方向，两侧各带 `num_ghost` 层 ghost；
//! 塌缩方向网格数为 1 且没有 ghost。

use ndarray::{Array3, Zip};
use tracing::warn;

use super::topology::ProcessTopology;
use gr_config::GridConfig;
use gr_foundation::{GrError, GrResult, ZoneIndex};

/// 单进程区块数超过此值时给出提示
const MAX_ZONES_WARNING: usize = 16_000_000;

/// 坐标位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// 区块中心
    Center,
    /// X1 下侧面中心 (i - ½)
    Left,
    /// X2 下侧面中心 (j - ½)
    Bottom,
    /// X3 下侧面中心 (k - ½)
    Back,
}

impl Location {
    /// 该位置沿 `axis` 的区块内偏移（以网格步长计）
    #[inline]
    fn offset(self, axis: usize) -> f64 {
        match (self, axis) {
            (Self::Left, 0) | (Self::Bottom, 1) | (Self::Back, 2) => 0.0,
            _ => 0.5,
        }
    }
}

/// 半开索引盒 `[lo, hi)`，按 (i, j, k) 排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneBox {
    /// 下界（含）
    pub lo: [usize; 3],
    /// 上界（不含）
    pub hi: [usize; 3],
}

impl ZoneBox {
    /// 区块数
    pub fn len(&self) -> usize {
        (0..3).map(|a| self.hi[a].saturating_sub(self.lo[a])).product()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 是否包含某区块
    pub fn contains(&self, zone: ZoneIndex) -> bool {
        (0..3).all(|a| zone.along(a) >= self.lo[a] && zone.along(a) < self.hi[a])
    }

    /// 按存储顺序（i 最快）遍历
    pub fn iter(&self) -> impl Iterator<Item = ZoneIndex> + '_ {
        let [i0, j0, k0] = self.lo;
        let [i1, j1, k1] = self.hi;
        (k0..k1).flat_map(move |k| {
            (j0..j1).flat_map(move |j| (i0..i1).map(move |i| ZoneIndex::new(i, j, k)))
        })
    }
}

/// 逻辑坐标网格
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    n_global: [usize; 3],
    dim: usize,
    num_ghost: usize,
    start: [f64; 3],
    end: [f64; 3],
    dx: [f64; 3],
    topology: ProcessTopology,
}

impl CoordinateGrid {
    /// 创建单进程网格
    pub fn new(
        n: [usize; 3],
        dim: usize,
        num_ghost: usize,
        start: [f64; 3],
        end: [f64; 3],
    ) -> GrResult<Self> {
        Self::with_topology(n, dim, num_ghost, start, end, ProcessTopology::serial(n))
    }

    /// 从配置创建单进程网格
    pub fn from_config(config: &GridConfig) -> GrResult<Self> {
        Self::new(
            config.n(),
            config.dim,
            config.num_ghost,
            config.start(),
            config.end(),
        )
    }

    /// 创建分布式网格，`n` 为全局网格数
    pub fn with_topology(
        n: [usize; 3],
        dim: usize,
        num_ghost: usize,
        start: [f64; 3],
        end: [f64; 3],
        topology: ProcessTopology,
    ) -> GrResult<Self> {
        Self::validate_parameters(n, dim, start, end)?;
        if topology.global_size() != n {
            return Err(GrError::invalid_grid(format!(
                "拓扑全局尺寸 {:?} 与网格 {:?} 不一致",
                topology.global_size(),
                n
            )));
        }

        let mut dx = [0.0; 3];
        for axis in 0..3 {
            dx[axis] = (end[axis] - start[axis]) / n[axis] as f64;
        }

        let grid = Self {
            n_global: n,
            dim,
            num_ghost,
            start,
            end,
            dx,
            topology,
        };

        let total: usize = grid.n_total().iter().product();
        if total > MAX_ZONES_WARNING {
            warn!("网格规模较大 ({} 区块)", total);
        }
        Ok(grid)
    }

    fn validate_parameters(
        n: [usize; 3],
        dim: usize,
        start: [f64; 3],
        end: [f64; 3],
    ) -> GrResult<()> {
        if !(1..=3).contains(&dim) {
            return Err(GrError::invalid_grid(format!("维数 {} 无效", dim)));
        }
        for axis in 0..3 {
            if n[axis] == 0 {
                return Err(GrError::invalid_grid(format!("N{} 必须 >= 1", axis + 1)));
            }
            if axis >= dim && n[axis] != 1 {
                return Err(GrError::invalid_grid(format!(
                    "dim = {} 时 N{} 必须为 1",
                    dim,
                    axis + 1
                )));
            }
            if !(start[axis] < end[axis]) || !start[axis].is_finite() || !end[axis].is_finite() {
                return Err(GrError::invalid_grid(format!(
                    "X{} 范围 [{}, {}] 无效",
                    axis + 1,
                    start[axis],
                    end[axis]
                )));
            }
        }
        Ok(())
    }

    // ========================================================================
    // 尺寸
    // ========================================================================

    /// 本地内部网格数 [N1, N2, N3]
    #[inline]
    pub fn n(&self) -> [usize; 3] {
        self.topology.local_size()
    }

    /// 全局网格数
    #[inline]
    pub fn n_global(&self) -> [usize; 3] {
        self.n_global
    }

    /// 空间维数
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// ghost 层宽度
    #[inline]
    pub fn num_ghost(&self) -> usize {
        self.num_ghost
    }

    /// 是否为活跃方向
    #[inline]
    pub fn is_active(&self, axis: usize) -> bool {
        axis < self.dim
    }

    /// 指定方向的 ghost 宽度（塌缩方向为 0）
    #[inline]
    pub fn ghost(&self, axis: usize) -> usize {
        if self.is_active(axis) {
            self.num_ghost
        } else {
            0
        }
    }

    /// 含 ghost 的本地网格数 [N1Total, N2Total, N3Total]
    pub fn n_total(&self) -> [usize; 3] {
        let n = self.n();
        [
            n[0] + 2 * self.ghost(0),
            n[1] + 2 * self.ghost(1),
            n[2] + 2 * self.ghost(2),
        ]
    }

    /// ndarray 形状 (N3Total, N2Total, N1Total)
    pub fn shape(&self) -> (usize, usize, usize) {
        let [n1, n2, n3] = self.n_total();
        (n3, n2, n1)
    }

    /// 网格步长 [dX1, dX2, dX3]
    #[inline]
    pub fn dx(&self) -> [f64; 3] {
        self.dx
    }

    /// 计算域起点
    #[inline]
    pub fn start(&self) -> [f64; 3] {
        self.start
    }

    /// 计算域终点
    #[inline]
    pub fn end(&self) -> [f64; 3] {
        self.end
    }

    /// 进程拓扑
    #[inline]
    pub fn topology(&self) -> &ProcessTopology {
        &self.topology
    }

    /// 内部区块索引盒
    pub fn interior(&self) -> ZoneBox {
        let n = self.n();
        let lo = [self.ghost(0), self.ghost(1), self.ghost(2)];
        ZoneBox {
            lo,
            hi: [lo[0] + n[0], lo[1] + n[1], lo[2] + n[2]],
        }
    }

    /// 含 ghost 的全部区块索引盒
    pub fn full(&self) -> ZoneBox {
        ZoneBox {
            lo: [0; 3],
            hi: self.n_total(),
        }
    }

    // ========================================================================
    // 坐标
    // ========================================================================

    /// 沿 `axis` 的单个逻辑坐标
    #[inline]
    pub fn coord(&self, axis: usize, idx: usize, loc: Location) -> f64 {
        let global = self.topology.local_offset()[axis] as f64 + idx as f64
            - self.ghost(axis) as f64
            + loc.offset(axis);
        self.start[axis] + global * self.dx[axis]
    }

    /// 区块的逻辑坐标 (X1, X2, X3)
    #[inline]
    pub fn x_at(&self, zone: ZoneIndex, loc: Location) -> [f64; 3] {
        [
            self.coord(0, zone.i, loc),
            self.coord(1, zone.j, loc),
            self.coord(2, zone.k, loc),
        ]
    }

    /// 全部区块的逻辑坐标数组 [X1, X2, X3]
    pub fn coords(&self, loc: Location) -> [Array3<f64>; 3] {
        let shape = self.shape();
        let mut out = [
            Array3::zeros(shape),
            Array3::zeros(shape),
            Array3::zeros(shape),
        ];
        for (axis, arr) in out.iter_mut().enumerate() {
            Zip::indexed(arr).par_for_each(|(k, j, i), x| {
                let idx = [i, j, k][axis];
                *x = self.coord(axis, idx, loc);
            });
        }
        out
    }

    /// 索引是否落在本地数组内
    #[inline]
    pub fn contains(&self, zone: ZoneIndex) -> bool {
        self.full().contains(zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid() -> CoordinateGrid {
        CoordinateGrid::new([8, 4, 1], 2, 3, [0.0; 3], [1.0; 3]).unwrap()
    }

    #[test]
    fn test_sizes() {
        let grid = unit_grid();
        assert_eq!(grid.n_total(), [14, 10, 1]);
        assert_eq!(grid.shape(), (1, 10, 14));
        assert_eq!(grid.ghost(2), 0);
        assert_eq!(grid.interior().lo, [3, 3, 0]);
        assert_eq!(grid.interior().len(), 32);
        assert_eq!(grid.full().len(), 140);
    }

    #[test]
    fn test_center_coordinates() {
        let grid = unit_grid();
        assert!((grid.coord(0, 3, Location::Center) - 0.0625).abs() < 1e-15);
        assert!((grid.coord(0, 0, Location::Center) + 0.3125).abs() < 1e-15);
        assert!((grid.coord(0, 3, Location::Left) - 0.0).abs() < 1e-15);
        // 塌缩方向取区间中点
        assert!((grid.coord(2, 0, Location::Center) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_coords_arrays_match_pointwise() {
        let grid = unit_grid();
        let [x1, x2, _] = grid.coords(Location::Center);
        let zone = ZoneIndex::new(5, 2, 0);
        let x = grid.x_at(zone, Location::Center);
        assert_eq!(x1[zone.kji()], x[0]);
        assert_eq!(x2[zone.kji()], x[1]);
    }

    #[test]
    fn test_invalid_grids() {
        assert!(CoordinateGrid::new([8, 4, 2], 2, 3, [0.0; 3], [1.0; 3]).is_err());
        assert!(CoordinateGrid::new([8, 0, 1], 2, 3, [0.0; 3], [1.0; 3]).is_err());
        assert!(CoordinateGrid::new([8, 4, 1], 4, 3, [0.0; 3], [1.0; 3]).is_err());
        assert!(CoordinateGrid::new([8, 4, 1], 2, 3, [1.0, 0.0, 0.0], [1.0; 3]).is_err());
    }

    #[test]
    fn test_zone_box_iteration_order() {
        let b = ZoneBox {
            lo: [0, 0, 0],
            hi: [2, 2, 1],
        };
        let zones: Vec<_> = b.iter().collect();
        assert_eq!(zones[1], ZoneIndex::new(1, 0, 0));
        assert_eq!(zones.len(), 4);
        assert!(b.contains(ZoneIndex::new(1, 1, 0)));
        assert!(!b.contains(ZoneIndex::new(2, 0, 0)));
    }
}
