//! # xpeak 子命令 CLI 定义
//!
//! XRD 峰位交互式指标化的参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/xpeak.rs`

use crate::models::config::DEFAULT_WAVELENGTH;

use clap::Args;
use std::path::PathBuf;

/// 预定义辐射源波长 (Å)
pub fn get_predefined_wavelength(name: &str) -> Option<f64> {
    match name.to_lowercase().as_str() {
        "cu-ka" | "cuka" => Some(1.5418),
        "cu-ka1" | "cuka1" => Some(DEFAULT_WAVELENGTH),
        "cu-ka2" | "cuka2" => Some(1.544414),
        "cu-kb1" | "cukb1" => Some(1.392218),
        "mo-ka" | "moka" => Some(0.7107),
        "mo-ka1" | "moka1" => Some(0.709317),
        "co-ka1" | "coka1" => Some(1.788965),
        "fe-ka1" | "feka1" => Some(1.936042),
        "cr-ka1" | "crka1" => Some(2.28970),
        "ag-ka1" | "agka1" => Some(0.559421),
        _ => None,
    }
}

/// 解析波长输入（辐射源名称或数值）
pub fn parse_wavelength(input: &str) -> Result<f64, String> {
    // 先尝试解析为预定义辐射源
    if let Some(wl) = get_predefined_wavelength(input) {
        return Ok(wl);
    }
    // 再尝试解析为数值
    input.parse::<f64>().map_err(|_| {
        format!(
            "Invalid wavelength '{}'. Use a number (e.g., 1.540593) or a name: cu-ka1, cu-ka, mo-ka1, co-ka1, fe-ka1, cr-ka1, ag-ka1",
            input
        )
    })
}

/// xpeak 子命令参数
#[derive(Args, Debug)]
pub struct XpeakArgs {
    /// Measurement file; its stem names the output '<stem>_peak.csv'
    pub input: PathBuf,

    /// Lattice constant in Å (required)
    #[arg(short = 'l', long = "lc")]
    pub lattice_constant: f64,

    /// X-ray wavelength: value in Å or radiation source name (cu-ka1, mo-ka1, ...)
    #[arg(
        short = 'w',
        long = "wl",
        default_value_t = DEFAULT_WAVELENGTH,
        value_parser = parse_wavelength
    )]
    pub wavelength: f64,

    /// Index against the AC11 crystal table (3 indices) instead of QC (6 indices)
    #[arg(short = 'a', long = "ac", default_value_t = false)]
    pub crystal: bool,

    /// Directory containing QC.csv / AC11.csv (default: ~/qc)
    #[arg(long, env = "QC_TABLE_DIR")]
    pub table_dir: Option<PathBuf>,

    /// Output CSV path (default: '<input stem>_peak.csv' next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
