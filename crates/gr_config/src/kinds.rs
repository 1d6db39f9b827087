// crates/gr_config/src/kinds.rs

//! 可序列化的类型枚举
//!
//! - `SpacetimeKind`: 时空类型
//! - `BoundaryKind`: 边界类型
//! - `Face`: 逻辑立方体的六个面
//! - `SlopeLimiter`: 参考通量格式的斜率限制器

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================
// 时空类型
// ============================================================

/// 时空类型，对每个 Geometry 实例不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpacetimeKind {
    /// 平直 Minkowski 时空
    #[default]
    Flat,
    /// Modified Kerr-Schild 黑洞时空
    ModifiedKerrSchild,
}

impl fmt::Display for SpacetimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flat => "Flat",
            Self::ModifiedKerrSchild => "ModifiedKerrSchild",
        };
        write!(f, "{}", name)
    }
}

// ============================================================
// 边界类型
// ============================================================

/// 边界类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BoundaryKind {
    /// 周期边界
    ///
    /// 由 halo 交换从对面回绕填充，需成对设置。
    #[default]
    Periodic = 0,

    /// 自由出流
    ///
    /// 零阶外推：ghost 区复制最近的内部区块。
    Outflow = 1,

    /// 反射边界
    ///
    /// 镜像内部区块，法向速度与法向磁场取反。
    Reflecting = 2,

    /// 禁止回流的出流
    ///
    /// 与 Outflow 相同，但若 ghost 区法向速度指向计算域内部则置零。
    NoInflow = 3,
}

impl BoundaryKind {
    /// 是否为周期边界
    #[inline]
    pub fn is_periodic(&self) -> bool {
        matches!(self, Self::Periodic)
    }

    /// 是否为开边界类型
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Outflow | Self::NoInflow)
    }

    /// 从 u8 值转换
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Periodic),
            1 => Some(Self::Outflow),
            2 => Some(Self::Reflecting),
            3 => Some(Self::NoInflow),
            _ => None,
        }
    }

    /// 转换为 u8 值
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Periodic => "Periodic",
            Self::Outflow => "Outflow",
            Self::Reflecting => "Reflecting",
            Self::NoInflow => "NoInflow",
        };
        write!(f, "{}", name)
    }
}

// ============================================================
// 面
// ============================================================

/// 逻辑立方体的面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    /// X1 下侧（left）
    X1Lower,
    /// X1 上侧（right）
    X1Upper,
    /// X2 下侧（bottom）
    X2Lower,
    /// X2 上侧（top）
    X2Upper,
    /// X3 下侧（back）
    X3Lower,
    /// X3 上侧（front）
    X3Upper,
}

impl Face {
    /// 全部六个面，按 X1、X2、X3 排序
    pub const ALL: [Face; 6] = [
        Face::X1Lower,
        Face::X1Upper,
        Face::X2Lower,
        Face::X2Upper,
        Face::X3Lower,
        Face::X3Upper,
    ];

    /// 面的法向轴（0, 1, 2）
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            Self::X1Lower | Self::X1Upper => 0,
            Self::X2Lower | Self::X2Upper => 1,
            Self::X3Lower | Self::X3Upper => 2,
        }
    }

    /// 是否为上侧面
    #[inline]
    pub fn is_upper(self) -> bool {
        matches!(self, Self::X1Upper | Self::X2Upper | Self::X3Upper)
    }

    /// 同一轴上的对面
    pub fn opposite(self) -> Self {
        match self {
            Self::X1Lower => Self::X1Upper,
            Self::X1Upper => Self::X1Lower,
            Self::X2Lower => Self::X2Upper,
            Self::X2Upper => Self::X2Lower,
            Self::X3Lower => Self::X3Upper,
            Self::X3Upper => Self::X3Lower,
        }
    }

    /// 指定轴与侧的面
    pub fn from_axis(axis: usize, upper: bool) -> Self {
        match (axis, upper) {
            (0, false) => Self::X1Lower,
            (0, true) => Self::X1Upper,
            (1, false) => Self::X2Lower,
            (1, true) => Self::X2Upper,
            (_, false) => Self::X3Lower,
            (_, true) => Self::X3Upper,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X1Lower => "X1-lower",
            Self::X1Upper => "X1-upper",
            Self::X2Lower => "X2-lower",
            Self::X2Upper => "X2-upper",
            Self::X3Lower => "X3-lower",
            Self::X3Upper => "X3-upper",
        };
        write!(f, "{}", name)
    }
}

// ============================================================
// 斜率限制器
// ============================================================

/// 斜率限制器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlopeLimiter {
    /// 一阶（无重构）
    FirstOrder,
    /// Minmod
    #[default]
    Minmod,
    /// Van Leer
    VanLeer,
}

impl SlopeLimiter {
    /// 重构模板半宽（界面两侧各需的区块数）
    #[inline]
    pub fn stencil_width(self) -> usize {
        match self {
            Self::FirstOrder => 1,
            Self::Minmod | Self::VanLeer => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_kind_u8() {
        for kind in [
            BoundaryKind::Periodic,
            BoundaryKind::Outflow,
            BoundaryKind::Reflecting,
            BoundaryKind::NoInflow,
        ] {
            assert_eq!(BoundaryKind::from_u8(kind.as_u8()), Some(kind));
        }
        assert_eq!(BoundaryKind::from_u8(9), None);
        assert!(BoundaryKind::NoInflow.is_open());
        assert!(!BoundaryKind::Reflecting.is_open());
    }

    #[test]
    fn test_face_geometry() {
        assert_eq!(Face::X2Upper.axis(), 1);
        assert!(Face::X3Upper.is_upper());
        assert_eq!(Face::X1Lower.opposite(), Face::X1Upper);
        for face in Face::ALL {
            assert_eq!(Face::from_axis(face.axis(), face.is_upper()), face);
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SpacetimeKind::ModifiedKerrSchild).unwrap();
        assert_eq!(json, "\"modified_kerr_schild\"");
        let kind: BoundaryKind = serde_json::from_str("\"no_inflow\"").unwrap();
        assert_eq!(kind, BoundaryKind::NoInflow);
    }
}
