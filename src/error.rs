//! # 统一错误处理模块
//!
//! 定义 qctool 的错误类型，使用 `thiserror` 派生。
//!
//! - `QcError`: 致命错误，终止整个运行
//! - `DomainError`: 单行数值计算失败，只影响该行的派生值
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// qctool 统一错误类型
#[derive(Error, Debug)]
pub enum QcError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Reference table not found: {path}")]
    FileNotFound { path: String },

    #[error("Terminal I/O failed")]
    Terminal(#[source] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed reference table {path} (line {line})\nReason: {reason}")]
    TableFormat {
        path: String,
        line: u64,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error")]
    CsvError(#[from] csv::Error),
}

/// 数值定义域错误（不终止会话）
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error("asin argument {argument} is outside [-1, 1]")]
    AsinOutOfRange { argument: f64 },

    #[error("division by zero at {angle}°")]
    DivisionByZero { angle: f64 },

    #[error("result is not a finite number")]
    NonFinite,
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, QcError>;

/// 拼接错误及其完整的 source 链，每个原因一行
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(&format!("\nCaused by: {}", cause));
        source = cause.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_csv_error_cause_printed_once() {
        let inner = io::Error::new(io::ErrorKind::Other, "disk full");
        let err = QcError::CsvError(csv::Error::from(inner));

        let msg = error_chain(&err);
        assert!(msg.starts_with("CSV error\nCaused by: "));
        assert_eq!(msg.matches("disk full").count(), 1);
    }

    #[test]
    fn test_error_chain_with_io_source() {
        let err = QcError::FileWriteError {
            path: "scan_peak.csv".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(
            error_chain(&err),
            "Failed to write file: scan_peak.csv\nCaused by: permission denied"
        );
    }
}
