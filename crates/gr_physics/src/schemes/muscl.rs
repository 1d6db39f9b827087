// crates/gr_physics/src/schemes/muscl.rs

//! MUSCL 斜率限制重构
//!
//! 面 i-½ 两侧状态：
//!
//! ```text
//! 左: q(i-1) + ½·Δ(q(i-2), q(i-1), q(i))
//! 右: q(i)   - ½·Δ(q(i-1), q(i), q(i+1))
//! ```

use num_traits::Float;

use gr_config::SlopeLimiter;
use gr_foundation::constants::tolerances;

/// 限制函数 φ(r)
#[inline(always)]
pub fn limiter_phi<T: Float>(r: T, kind: SlopeLimiter) -> T {
    match kind {
        SlopeLimiter::FirstOrder => T::zero(),
        SlopeLimiter::Minmod => r.max(T::zero()).min(T::one()),
        SlopeLimiter::VanLeer => {
            let abs_r = r.abs();
            (r + abs_r) / (T::one() + abs_r)
        }
    }
}

/// 限制后的斜率 Δ
#[inline(always)]
pub fn limited_slope<T: Float>(left: T, center: T, right: T, kind: SlopeLimiter) -> T {
    let d_l = center - left;
    let d_r = right - center;
    let eps = T::from(tolerances::SLOPE_EPSILON).unwrap_or_else(T::epsilon);
    if d_r.abs() < eps {
        return T::zero();
    }
    limiter_phi(d_l / d_r, kind) * d_r
}

/// 面 i-½ 的 (左, 右) 状态
///
/// 输入为四点模板 (i-2, i-1, i, i+1)。
#[inline]
pub fn reconstruct_face<T: Float>(stencil: [T; 4], kind: SlopeLimiter) -> (T, T) {
    let [q_im2, q_im1, q_i, q_ip1] = stencil;
    if kind == SlopeLimiter::FirstOrder {
        return (q_im1, q_i);
    }
    let half = T::from(0.5).unwrap_or_else(T::zero);
    let left = q_im1 + half * limited_slope(q_im2, q_im1, q_i, kind);
    let right = q_i - half * limited_slope(q_im1, q_i, q_ip1, kind);
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minmod_limits_extrema() {
        // 局部极值处斜率为零
        assert_eq!(limited_slope(1.0, 2.0, 1.0, SlopeLimiter::Minmod), 0.0);
        // 单调区取较小差分
        assert!((limited_slope(0.0, 1.0, 3.0, SlopeLimiter::Minmod) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_van_leer_harmonic_mean() {
        // 2·d_l·d_r / (d_l + d_r)
        let s = limited_slope(0.0, 1.0, 3.0, SlopeLimiter::VanLeer);
        assert!((s - 4.0 / 3.0).abs() < 1e-14);
    }

    #[test]
    fn test_linear_profile_is_exact() {
        for kind in [SlopeLimiter::Minmod, SlopeLimiter::VanLeer] {
            let (l, r) = reconstruct_face([1.0, 2.0, 3.0, 4.0], kind);
            assert!((l - 2.5).abs() < 1e-14);
            assert!((r - 2.5).abs() < 1e-14);
        }
    }

    #[test]
    fn test_first_order_uses_cell_values() {
        let (l, r) = reconstruct_face([1.0_f32, 2.0, 3.0, 4.0], SlopeLimiter::FirstOrder);
        assert_eq!((l, r), (2.0, 3.0));
    }
}
