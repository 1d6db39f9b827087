// crates/gr_physics/src/state.rs

//! 流体状态 (带 ghost 层)
//!
//! 变量存储为 `Array4<f64>`，索引 (var, k, j, i)，空间维度含 ghost 层。
//! 原始量与守恒量共用此类型，变量编号见 `gr_foundation::constants::vars`。

use ndarray::{s, Array4, ArrayView3, ArrayViewMut3, Axis};

use crate::grid::{CoordinateGrid, ZoneBox};
use gr_foundation::{GrError, GrResult, StepStage, ZoneIndex};

/// 流体状态
#[derive(Debug, Clone, PartialEq)]
pub struct FluidState {
    vars: Array4<f64>,
}

impl FluidState {
    /// 按网格尺寸创建全零状态
    pub fn new(num_vars: usize, grid: &CoordinateGrid) -> Self {
        Self::zeros(num_vars, grid.shape())
    }

    /// 按 (N3Total, N2Total, N1Total) 创建全零状态
    pub fn zeros(num_vars: usize, (n3, n2, n1): (usize, usize, usize)) -> Self {
        Self {
            vars: Array4::zeros((num_vars, n3, n2, n1)),
        }
    }

    /// 由已有数组创建
    pub fn from_array(vars: Array4<f64>) -> Self {
        Self { vars }
    }

    /// 同尺寸的全零状态（双缓冲）
    pub fn clone_structure(&self) -> Self {
        Self {
            vars: Array4::zeros(self.vars.raw_dim()),
        }
    }

    /// 变量数
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.vars.len_of(Axis(0))
    }

    /// 空间形状 (N3Total, N2Total, N1Total)
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        let (_, n3, n2, n1) = self.vars.dim();
        (n3, n2, n1)
    }

    /// 检查与网格尺寸一致
    pub fn check_grid(&self, grid: &CoordinateGrid) -> GrResult<()> {
        if self.shape() != grid.shape() {
            return Err(GrError::invalid_grid(format!(
                "状态尺寸 {:?} 与网格 {:?} 不匹配",
                self.shape(),
                grid.shape()
            )));
        }
        Ok(())
    }

    // ========================================================================
    // 访问
    // ========================================================================

    /// 全部变量
    #[inline]
    pub fn vars(&self) -> &Array4<f64> {
        &self.vars
    }

    /// 全部变量（可变）
    #[inline]
    pub fn vars_mut(&mut self) -> &mut Array4<f64> {
        &mut self.vars
    }

    /// 整体替换变量
    pub fn set_vars(&mut self, values: &Array4<f64>) -> GrResult<()> {
        if values.dim() != self.vars.dim() {
            return Err(GrError::invalid_grid(format!(
                "变量数组尺寸 {:?} 与状态 {:?} 不匹配",
                values.dim(),
                self.vars.dim()
            )));
        }
        self.vars.assign(values);
        Ok(())
    }

    /// 单个变量视图 (k, j, i)
    #[inline]
    pub fn var(&self, v: usize) -> ArrayView3<'_, f64> {
        self.vars.index_axis(Axis(0), v)
    }

    /// 单个变量可变视图
    #[inline]
    pub fn var_mut(&mut self, v: usize) -> ArrayViewMut3<'_, f64> {
        self.vars.index_axis_mut(Axis(0), v)
    }

    /// 替换单个变量
    pub fn set_var(&mut self, v: usize, values: ArrayView3<'_, f64>) -> GrResult<()> {
        if v >= self.num_vars() || values.dim() != self.shape() {
            return Err(GrError::invalid_grid(format!(
                "变量 {} 尺寸 {:?} 与状态 {:?} 不匹配",
                v,
                values.dim(),
                self.shape()
            )));
        }
        self.var_mut(v).assign(&values);
        Ok(())
    }

    /// 读取单个值
    #[inline]
    pub fn get(&self, v: usize, zone: ZoneIndex) -> f64 {
        self.vars[[v, zone.k, zone.j, zone.i]]
    }

    /// 写入单个值
    #[inline]
    pub fn set(&mut self, v: usize, zone: ZoneIndex, value: f64) {
        self.vars[[v, zone.k, zone.j, zone.i]] = value;
    }

    /// 某变量在索引盒内的视图
    pub fn region(&self, v: usize, region: &ZoneBox) -> ArrayView3<'_, f64> {
        let [i0, j0, k0] = region.lo;
        let [i1, j1, k1] = region.hi;
        self.vars.slice(s![v, k0..k1, j0..j1, i0..i1])
    }

    /// 某变量的内部区视图
    pub fn interior(&self, v: usize, grid: &CoordinateGrid) -> ArrayView3<'_, f64> {
        self.region(v, &grid.interior())
    }

    /// 从另一状态复制全部数据
    pub fn copy_from(&mut self, other: &FluidState) {
        self.vars.assign(&other.vars);
    }

    // ========================================================================
    // 校验
    // ========================================================================

    /// 查找索引盒内第一个非有限值
    pub fn find_non_finite(&self, region: &ZoneBox) -> Option<(ZoneIndex, usize)> {
        region.iter().find_map(|zone| {
            (0..self.num_vars())
                .find(|&v| !self.get(v, zone).is_finite())
                .map(|v| (zone, v))
        })
    }

    /// 检查索引盒内全部为有限值
    pub fn validate(&self, region: &ZoneBox, stage: StepStage) -> GrResult<()> {
        match self.find_non_finite(region) {
            Some((zone, v)) => Err(GrError::non_finite(zone, stage, v)),
            None => Ok(()),
        }
    }
}
