//! # 运行配置与结构模式
//!
//! `StructureMode` 决定下游所有组件使用的变体：参考表文件名、指数个数、
//! 表头形状以及几何公式。`Config` 在启动时构造一次，此后只读。
//!
//! ## 依赖关系
//! - 被 `commands/xpeak.rs` 构造
//! - 被 `parsers/reflections.rs`、`xpeak/` 读取

use crate::error::{QcError, Result};

/// Cu-Kα1 波长 (Å)
pub const DEFAULT_WAVELENGTH: f64 = 1.540593;

/// 结构模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructureMode {
    /// 准晶，6 指数 (h,k,l,m,n,o)
    #[default]
    Quasicrystal,
    /// 近似晶体 (AC11)，3 指数 (h,k,l)
    Crystal,
}

impl StructureMode {
    /// 由 `--ac` 标志选择模式
    pub fn from_flag(is_crystal: bool) -> Self {
        if is_crystal {
            StructureMode::Crystal
        } else {
            StructureMode::Quasicrystal
        }
    }

    /// 每行指数个数
    pub fn arity(&self) -> usize {
        match self {
            StructureMode::Quasicrystal => 6,
            StructureMode::Crystal => 3,
        }
    }

    /// 参考表文件名
    pub fn table_file_name(&self) -> &'static str {
        match self {
            StructureMode::Quasicrystal => "QC.csv",
            StructureMode::Crystal => "AC11.csv",
        }
    }

    /// 输出 CSV 表头
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            StructureMode::Quasicrystal => &[
                "h",
                "k",
                "l",
                "m",
                "n",
                "o",
                "2theta",
                "NR",
                "lattice constant",
            ],
            StructureMode::Crystal => &["h", "k", "l", "2theta", "NR", "lattice constant"],
        }
    }
}

impl std::fmt::Display for StructureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureMode::Quasicrystal => write!(f, "quasicrystal (6-index)"),
            StructureMode::Crystal => write!(f, "crystal AC11 (3-index)"),
        }
    }
}

/// 峰位指标化配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// X 射线波长 (Å)
    pub wavelength: f64,
    /// 晶格常数 (Å)
    pub lattice_constant: f64,
    pub mode: StructureMode,
}

impl Config {
    /// 校验并创建配置
    pub fn new(wavelength: f64, lattice_constant: f64, mode: StructureMode) -> Result<Self> {
        if !wavelength.is_finite() || wavelength <= 0.0 {
            return Err(QcError::InvalidArgument(format!(
                "wavelength must be a positive number, got {}",
                wavelength
            )));
        }
        if !lattice_constant.is_finite() || lattice_constant <= 0.0 {
            return Err(QcError::InvalidArgument(format!(
                "lattice constant must be a positive number, got {}",
                lattice_constant
            )));
        }

        Ok(Config {
            wavelength,
            lattice_constant,
            mode,
        })
    }
}
