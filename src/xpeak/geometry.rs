//! # 倒易空间几何计算
//!
//! 峰位指标化的核心公式，全部为纯函数。
//!
//! ## 算法概述
//! 1. 由指数计算倒易矢量模长平方 N
//!    - 晶体: N = h² + k² + l²
//!    - 准晶: 6 维指数经 √5 投影矩阵得到 r1..r6，N = Σrᵢ² / 20
//! 2. 预测 Bragg 角: θ = asin(λ√N / 2a)
//! 3. 由观测角反推晶格常数: a = λ√N / 2sinθ
//! 4. Nelson-Riley 校正项: cos²θ/sinθ + cos²θ/θ
//!
//! ## 依赖关系
//! - 被 `xpeak/session.rs` 调用
//! - 使用 `models/` 的 Config, Reflection, StructureMode

use crate::error::DomainError;
use crate::models::{Config, Reflection, StructureMode};

/// 准晶投影矩阵的非对角系数，对角元为 √5
const QC_PROJECTION_SIGNS: [[f64; 6]; 6] = [
    [0.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, -1.0, -1.0, 1.0],
    [1.0, 1.0, 0.0, 1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0, 0.0, 1.0, -1.0],
    [1.0, -1.0, -1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, -1.0, -1.0, 1.0, 0.0],
];

/// 平方和
pub fn squared_norm(components: &[f64]) -> f64 {
    components.iter().map(|c| c * c).sum()
}

/// 6 维指数投影到物理空间 (r1..r6)
pub fn project_quasicrystal(indices: &[f64; 6]) -> [f64; 6] {
    let sqrt5 = 5.0_f64.sqrt();
    let mut r = [0.0; 6];

    for (row, signs) in QC_PROJECTION_SIGNS.iter().enumerate() {
        r[row] = indices
            .iter()
            .zip(signs.iter())
            .enumerate()
            .fold(0.0, |acc, (col, (x, s))| {
                if col == row {
                    acc + sqrt5 * x
                } else {
                    acc + s * x
                }
            });
    }

    r
}

/// 倒易矢量模长平方 N，按模式分派
pub fn reciprocal_norm(mode: StructureMode, reflection: &Reflection) -> f64 {
    debug_assert_eq!(reflection.arity(), mode.arity());

    match mode {
        StructureMode::Crystal => squared_norm(reflection.indices()),
        StructureMode::Quasicrystal => {
            let mut hklmno = [0.0; 6];
            hklmno.copy_from_slice(reflection.indices());
            squared_norm(&project_quasicrystal(&hklmno)) / 20.0
        }
    }
}

/// Nelson-Riley 校正项 (θ 单位：度)
pub fn nelson_riley(theta: f64) -> Result<f64, DomainError> {
    let r = theta.to_radians();
    let sin = r.sin();
    if r == 0.0 || sin == 0.0 {
        return Err(DomainError::DivisionByZero { angle: theta });
    }

    let i = r.cos().powi(2);
    finite(i / sin + i / r)
}

fn finite(value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::NonFinite)
    }
}

/// 峰位计算器
pub struct PeakCalculator {
    /// X 射线波长（Å）
    wavelength: f64,
    /// 晶格常数（Å）
    lattice_constant: f64,
}

impl PeakCalculator {
    pub fn new(config: &Config) -> Self {
        Self {
            wavelength: config.wavelength,
            lattice_constant: config.lattice_constant,
        }
    }

    /// 预测衍射角（度）
    pub fn predicted_angle(&self, norm: f64) -> Result<f64, DomainError> {
        let argument = self.wavelength * norm.sqrt() / 2.0 / self.lattice_constant;
        if !(-1.0..=1.0).contains(&argument) {
            return Err(DomainError::AsinOutOfRange { argument });
        }

        Ok(argument.asin().to_degrees())
    }

    /// 由观测角（度）反推晶格常数
    pub fn inverse_lattice_constant(&self, norm: f64, theta: f64) -> Result<f64, DomainError> {
        let sin = theta.to_radians().sin();
        if sin == 0.0 {
            return Err(DomainError::DivisionByZero { angle: theta });
        }

        finite(self.wavelength * norm.sqrt() / 2.0 / sin)
    }
}
