//! # 数据模型模块
//!
//! 定义结构模式、运行配置、衍射指数与峰位表的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`xpeak/` 和 `commands/` 使用
//! - 子模块: config, reflection, peak

pub mod config;
pub mod peak;
pub mod reflection;

pub use config::{Config, StructureMode};
pub use peak::{PeakRecord, PeakTable};
pub use reflection::Reflection;
