//! # 工具函数模块
//!
//! 提供美化输出与数值格式化工具。
//!
//! ## 依赖关系
//! - 被 `commands/`、`models/`、`xpeak/` 模块使用
//! - 子模块: output, format

pub mod format;
pub mod output;
