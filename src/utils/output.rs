//! # 美化输出工具
//!
//! 提供统一的终端输出样式。
//!
//! ## 依赖关系
//! - 被 `main.rs` 和 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{}", info_line(msg));
}

/// 信息行文本，供写入任意输出流
pub fn info_line(msg: &str) -> String {
    format!("{} {}", "[*]".blue().bold(), msg)
}

/// 警告行文本，供写入任意输出流（交互会话）
pub fn warning_line(msg: &str) -> String {
    format!("{} {}", "[WARN]".yellow().bold(), msg)
}

/// 打印标题栏
pub fn print_header(title: &str) {
    println!("{}", header_block(title));
}

/// 标题栏文本（前后各含一空行）
pub fn header_block(title: &str) -> String {
    let line = "─".repeat(60);
    format!("\n{}\n  {}\n{}\n", line.dimmed(), title.bold(), line.dimmed())
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}
