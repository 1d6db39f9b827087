// crates/gr_foundation/src/constants.rs

//! 常量定义
//!
//! 按用途分组：原始变量编号、数值容差、系统默认值。

/// 原始变量编号 (Primitive Variable Layout)
///
/// 状态数组第一维的顺序。守恒量沿用同一编号。
pub mod vars {
    /// 静止质量密度
    pub const RHO: usize = 0;
    /// 内能
    pub const UU: usize = 1;
    /// X1 速度分量
    pub const U1: usize = 2;
    /// X2 速度分量
    pub const U2: usize = 3;
    /// X3 速度分量
    pub const U3: usize = 4;
    /// X1 磁场分量
    pub const B1: usize = 5;
    /// X2 磁场分量
    pub const B2: usize = 6;
    /// X3 磁场分量
    pub const B3: usize = 7;

    /// 磁流体所需的最少变量数
    pub const MIN_VARS: usize = 8;

    /// 第 `axis` 方向的速度分量编号
    #[inline]
    pub const fn velocity(axis: usize) -> usize {
        U1 + axis
    }

    /// 第 `axis` 方向的磁场分量编号
    #[inline]
    pub const fn field(axis: usize) -> usize {
        B1 + axis
    }

    /// 是否为磁场分量
    #[inline]
    pub const fn is_field(var: usize) -> bool {
        var >= B1 && var <= B3
    }

    /// 变量名（用于日志）
    pub fn name(var: usize) -> &'static str {
        match var {
            RHO => "rho",
            UU => "u",
            U1 => "u1",
            U2 => "u2",
            U3 => "u3",
            B1 => "B1",
            B2 => "B2",
            B3 => "B3",
            _ => "passive",
        }
    }
}

/// 数值容差 (Numerical Tolerances)
pub mod tolerances {
    /// 联络系数扰动差分步长（逻辑坐标）
    pub const CONNECTION_DELTA: f64 = 1e-5;

    /// |sin θ| 下限，防止极点处度规退化
    pub const SIN_THETA_FLOOR: f64 = 1e-20;

    /// 协变度规行列式判定奇异的阈值（det 必须 < -该值）
    pub const SINGULAR_DETERMINANT: f64 = 1e-300;

    /// 张量对称性检查容差
    pub const SYMMETRY: f64 = 1e-12;

    /// 逆坐标映射 Newton 迭代收敛容差
    pub const INVERSE_MAP: f64 = 1e-14;

    /// 逆坐标映射最大迭代次数
    pub const INVERSE_MAP_MAX_ITER: usize = 64;

    /// 散度守恒判据（相对场强）
    pub const DIV_B: f64 = 1e-10;

    /// 斜率计算中视为零的差分
    pub const SLOPE_EPSILON: f64 = 1e-14;
}

/// 系统默认值 (Defaults)
pub mod defaults {
    /// 幽灵层厚度，MUSCL 重构与 CT 平均共需 3 层
    pub const NUM_GHOST: usize = 3;

    /// 每方向网格数
    pub const N: usize = 8;

    /// 空间维数
    pub const DIM: usize = 3;

    /// 时间步长
    pub const DT: f64 = 0.002;

    /// Modified Kerr-Schild θ 压缩斜率
    pub const H_SLOPE: f64 = 0.3;

    /// 黑洞自旋
    pub const BLACK_HOLE_SPIN: f64 = 0.9;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_layout() {
        assert_eq!(vars::velocity(0), vars::U1);
        assert_eq!(vars::velocity(2), vars::U3);
        assert_eq!(vars::field(1), vars::B2);
        assert!(vars::is_field(vars::B3));
        assert!(!vars::is_field(vars::U3));
        assert_eq!(vars::MIN_VARS, vars::B3 + 1);
        assert_eq!(vars::name(vars::B1), "B1");
    }

    #[test]
    fn test_ghost_width_covers_reconstruction() {
        // MUSCL 两层 + CT 横向一层
        assert!(defaults::NUM_GHOST >= 3);
    }
}
