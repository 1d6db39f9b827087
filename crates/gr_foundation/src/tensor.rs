// crates/gr_foundation/src/tensor.rs

//! 4×4 张量工具
//!
//! 度规按行主序 `m[μ][ν]` 存储。求逆与行列式借助 `glam::DMat4`：
//! `from_cols_array_2d` 将行读作列得到转置矩阵，其逆再经
//! `to_cols_array_2d` 转回时恰好还原行主序，因此无需额外转置。

use glam::DMat4;

/// 二阶张量（4×4，行主序）
pub type Tensor2 = [[f64; 4]; 4];

/// 三阶张量 `t[a][b][c]`
pub type Tensor3 = [[[f64; 4]; 4]; 4];

/// 零二阶张量
pub const ZERO2: Tensor2 = [[0.0; 4]; 4];

/// 零三阶张量
pub const ZERO3: Tensor3 = [[[0.0; 4]; 4]; 4];

/// Minkowski 度规 diag(-1, 1, 1, 1)
pub const MINKOWSKI: Tensor2 = [
    [-1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// 单位张量
pub const IDENTITY: Tensor2 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// 行列式
#[inline]
pub fn determinant(m: &Tensor2) -> f64 {
    DMat4::from_cols_array_2d(m).determinant()
}

/// 矩阵逆
///
/// 行列式为零或结果含非有限值时返回 `None`。
pub fn inverse(m: &Tensor2) -> Option<Tensor2> {
    let mat = DMat4::from_cols_array_2d(m);
    let det = mat.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inv = mat.inverse().to_cols_array_2d();
    if inv.iter().flatten().all(|v| v.is_finite()) {
        Some(inv)
    } else {
        None
    }
}

/// 矩阵乘法 `a · b`
pub fn matmul(a: &Tensor2, b: &Tensor2) -> Tensor2 {
    let mut out = ZERO2;
    for (mu, row) in out.iter_mut().enumerate() {
        for (nu, value) in row.iter_mut().enumerate() {
            *value = (0..4).map(|l| a[mu][l] * b[l][nu]).sum();
        }
    }
    out
}

/// 转置
pub fn transpose(m: &Tensor2) -> Tensor2 {
    let mut out = ZERO2;
    for mu in 0..4 {
        for nu in 0..4 {
            out[mu][nu] = m[nu][mu];
        }
    }
    out
}

/// 对称化 ½(m + mᵀ)，结果精确对称
pub fn symmetrize(m: &Tensor2) -> Tensor2 {
    let mut out = *m;
    for mu in 0..4 {
        for nu in (mu + 1)..4 {
            let avg = 0.5 * (m[mu][nu] + m[nu][mu]);
            out[mu][nu] = avg;
            out[nu][mu] = avg;
        }
    }
    out
}

/// 按相对容差检查对称性
pub fn is_symmetric(m: &Tensor2, tol: f64) -> bool {
    (0..4).all(|mu| {
        (0..4).all(|nu| {
            let scale = 1.0 + m[mu][nu].abs().max(m[nu][mu].abs());
            (m[mu][nu] - m[nu][mu]).abs() <= tol * scale
        })
    })
}

/// 最大元素绝对值
pub fn max_abs(m: &Tensor2) -> f64 {
    m.iter().flatten().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// 对三阶张量后两个指标对称化
pub fn symmetrize_lower(t: &mut Tensor3) {
    for plane in t.iter_mut() {
        *plane = symmetrize(plane);
    }
}
