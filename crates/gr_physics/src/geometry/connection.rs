// crates/gr_physics/src/geometry/connection.rs

//! 联络系数（Christoffel 符号）
//!
//! ```text
//! Γ^a_{bc} = ½ g^{ad} (∂_b g_{dc} + ∂_c g_{db} - ∂_d g_{bc})
//! ```
//!
//! 度规对逻辑坐标的导数用中心差分求得，时间导数为零（稳态度规）。
//! 差分误差会破坏 b、c 两指标的对称性，因此结果显式对称化。

use gr_foundation::tensor::{self, Tensor2, Tensor3, ZERO2, ZERO3};

/// 单区块联络系数 `Γ[a][b][c]`
pub type Connection = Tensor3;

/// 度规导数的差分模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStencil {
    /// 在 X ± δ 处重新计算解析度规（δ = 1e-5），可覆盖全部区块
    #[default]
    Perturbed,
    /// 用缓存中相邻区块的度规沿 2·dX 差分
    ///
    /// 活跃方向必须至少有 1 层 ghost，最外一层 ghost 不计算；
    /// 塌缩方向没有相邻区块，退回解析扰动差分。
    Neighbor,
}

/// 中心差分 `(plus - minus) / (2h)`
pub(crate) fn centered_difference(plus: &Tensor2, minus: &Tensor2, h: f64) -> Tensor2 {
    let mut out = ZERO2;
    let inv = 0.5 / h;
    for mu in 0..4 {
        for nu in 0..4 {
            out[mu][nu] = (plus[mu][nu] - minus[mu][nu]) * inv;
        }
    }
    out
}

/// 由逆变度规与度规导数缩并得到联络系数
///
/// `dg[c][a][b] = ∂_c g_{ab}`。
pub fn christoffel(gcon: &Tensor2, dg: &[Tensor2; 4]) -> Connection {
    // Γ_{dbc}（第一类）
    let mut lower = ZERO3;
    for d in 0..4 {
        for b in 0..4 {
            for c in 0..4 {
                lower[d][b][c] = 0.5 * (dg[b][d][c] + dg[c][d][b] - dg[d][b][c]);
            }
        }
    }

    let mut gamma = ZERO3;
    for a in 0..4 {
        for b in 0..4 {
            for c in 0..4 {
                gamma[a][b][c] = (0..4).map(|d| gcon[a][d] * lower[d][b][c]).sum();
            }
        }
    }
    tensor::symmetrize_lower(&mut gamma);
    gamma
}

#[cfg(test)]
mod tests {
    use super::*;
    use gr_foundation::tensor::MINKOWSKI;

    #[test]
    fn test_flat_connection_vanishes() {
        let gamma = christoffel(&MINKOWSKI, &[ZERO2; 4]);
        assert_eq!(gamma, ZERO3);
    }

    #[test]
    fn test_polar_plane_connection() {
        // 平面极坐标 ds² = -dt² + dr² + r² dθ²，r = 2
        let r = 2.0;
        let mut gcon = MINKOWSKI;
        gcon[2][2] = 1.0 / (r * r);
        let mut dg = [ZERO2; 4];
        dg[1][2][2] = 2.0 * r;
        let gamma = christoffel(&gcon, &dg);
        assert!((gamma[1][2][2] + r).abs() < 1e-15);
        assert!((gamma[2][1][2] - 1.0 / r).abs() < 1e-15);
        assert_eq!(gamma[2][1][2], gamma[2][2][1]);
        assert_eq!(gamma[0][1][1], 0.0);
    }

    #[test]
    fn test_centered_difference() {
        let mut plus = ZERO2;
        let mut minus = ZERO2;
        plus[1][1] = 3.0;
        minus[1][1] = 1.0;
        assert_eq!(centered_difference(&plus, &minus, 0.5)[1][1], 2.0);
    }
}
