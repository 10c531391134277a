//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `xpeak`: XRD 峰位交互式指标化
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: xpeak

pub mod xpeak;

use clap::{Parser, Subcommand};

/// qc - 准晶分析命令行工具
#[derive(Parser, Debug)]
#[command(name = "qc")]
#[command(version)]
#[command(about = "Quasicrystal analysis CLI tools", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// XRD peak search: index observed peaks against a reference reflection table
    Xpeak(xpeak::XpeakArgs),
}
