//! # 解析器模块
//!
//! 读取指标化所需的参考反射表。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: reflections

pub mod reflections;

pub use reflections::ReflectionReader;
