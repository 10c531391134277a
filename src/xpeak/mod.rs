//! # XRD 峰位指标化模块
//!
//! 由参考反射表和操作者输入的观测角生成峰位表。
//!
//! ## 子模块
//! - `geometry`: 倒易空间几何计算
//! - `session`: 交互式指标化会话
//! - `export`: 峰位表 CSV 导出
//!
//! ## 依赖关系
//! - 被 `commands/xpeak.rs` 使用
//! - 使用 `models/` 数据模型

pub mod export;
pub mod geometry;
pub mod session;

pub use session::IndexingSession;
