// crates/gr_foundation/src/index.rs

//! 区块索引与推进阶段
//!
//! `ZoneIndex` 使用含 ghost 层的局部数组索引，按 (i, j, k) 对应 (X1, X2, X3)。
//! 数组本身按 (k, j, i) 存储，见 [`ZoneIndex::kji`]。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 区块索引（含 ghost 层的局部索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ZoneIndex {
    /// X1 方向索引
    pub i: usize,
    /// X2 方向索引
    pub j: usize,
    /// X3 方向索引
    pub k: usize,
}

impl ZoneIndex {
    /// 创建索引
    #[inline]
    pub const fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    /// 由数组存储顺序 (k, j, i) 构造
    #[inline]
    pub const fn from_kji((k, j, i): (usize, usize, usize)) -> Self {
        Self { i, j, k }
    }

    /// 转换为数组存储顺序 (k, j, i)
    #[inline]
    pub const fn kji(self) -> (usize, usize, usize) {
        (self.k, self.j, self.i)
    }

    /// 按轴取分量（0 → i, 1 → j, 2 → k）
    #[inline]
    pub fn along(self, axis: usize) -> usize {
        match axis {
            0 => self.i,
            1 => self.j,
            _ => self.k,
        }
    }

    /// 沿 `axis` 正向移动 `by` 个区块
    #[inline]
    pub fn plus(self, axis: usize, by: usize) -> Self {
        let mut out = self;
        match axis {
            0 => out.i += by,
            1 => out.j += by,
            _ => out.k += by,
        }
        out
    }

    /// 沿 `axis` 负向移动 `by` 个区块，越过 0 时返回 `None`
    #[inline]
    pub fn minus(self, axis: usize, by: usize) -> Option<Self> {
        let mut out = self;
        let slot = match axis {
            0 => &mut out.i,
            1 => &mut out.j,
            _ => &mut out.k,
        };
        *slot = slot.checked_sub(by)?;
        Some(out)
    }
}

impl fmt::Display for ZoneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(i={}, j={}, k={})", self.i, self.j, self.k)
    }
}

/// 约束输运推进阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStage {
    /// 半步预估
    Predictor,
    /// 整步校正
    Corrector,
}

impl fmt::Display for StepStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Predictor => "predictor",
            Self::Corrector => "corrector",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kji_conversion() {
        let zone = ZoneIndex::new(4, 5, 6);
        assert_eq!(zone.kji(), (6, 5, 4));
        assert_eq!(ZoneIndex::from_kji((6, 5, 4)), zone);
        assert_eq!(zone.along(0), 4);
        assert_eq!(zone.along(2), 6);
    }

    #[test]
    fn test_shift() {
        let zone = ZoneIndex::new(1, 2, 3);
        assert_eq!(zone.plus(1, 2), ZoneIndex::new(1, 4, 3));
        assert_eq!(zone.minus(2, 3), Some(ZoneIndex::new(1, 2, 0)));
        assert_eq!(zone.minus(0, 2), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ZoneIndex::new(1, 2, 3).to_string(), "(i=1, j=2, k=3)");
        assert_eq!(StepStage::Corrector.to_string(), "corrector");
    }
}
