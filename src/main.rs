//! # qc - 准晶分析命令行工具
//!
//! 交互式 XRD 峰位指标化：按结构模式（准晶 6 指数 / AC11 晶体 3 指数）
//! 读取参考反射表，预测各反射的衍射角，由操作者输入观测角，反推
//! 晶格常数与 Nelson-Riley 校正项并导出 CSV。
//!
//! ## 子命令
//! - `xpeak` - XRD 峰位指标化
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (参考表读取)
//!   │     ├── xpeak/     (几何计算、交互会话、导出)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod utils;
mod xpeak;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&error::error_chain(&e));
        std::process::exit(1);
    }
}
