//! # 峰位记录与峰位表
//!
//! `PeakTable` 持有由结构模式决定的表头和按顺序追加的 `PeakRecord`。
//! 记录一经追加不再修改；表在会话结束后一次性写出。
//!
//! ## 依赖关系
//! - 被 `xpeak/session.rs` 构造
//! - 被 `xpeak/export.rs` 和 `commands/xpeak.rs` 读取
//! - 使用 `utils/format.rs` 序列化数值

use crate::error::DomainError;
use crate::models::{Reflection, StructureMode};
use crate::utils::format::format_decimal;

/// 派生值：有限数值或定义域错误
pub type Derived = std::result::Result<f64, DomainError>;

/// 一个已确认的衍射峰
#[derive(Debug, Clone, PartialEq)]
pub struct PeakRecord {
    /// 指数文本
    pub indices: Vec<String>,
    /// 操作者输入的观测角（原文）
    pub observed: String,
    /// Nelson-Riley 校正项
    pub nr: Derived,
    /// 反推晶格常数 (Å)
    pub lattice_constant: Derived,
}

impl PeakRecord {
    pub fn new(
        reflection: &Reflection,
        observed: &str,
        nr: Derived,
        lattice_constant: Derived,
    ) -> Self {
        PeakRecord {
            indices: reflection.labels().to_vec(),
            observed: observed.to_string(),
            nr,
            lattice_constant,
        }
    }

    /// 转为 CSV 字段；计算失败的派生值写为空字段
    pub fn fields(&self) -> Vec<String> {
        let mut fields = self.indices.clone();
        fields.push(self.observed.clone());
        fields.push(derived_field(&self.nr));
        fields.push(derived_field(&self.lattice_constant));
        fields
    }
}

fn derived_field(value: &Derived) -> String {
    match value {
        Ok(v) => format_decimal(*v),
        Err(_) => String::new(),
    }
}

/// 峰位表
#[derive(Debug, Clone)]
pub struct PeakTable {
    mode: StructureMode,
    records: Vec<PeakRecord>,
}

impl PeakTable {
    /// 创建空表，表头由模式固定
    pub fn new(mode: StructureMode) -> Self {
        PeakTable {
            mode,
            records: Vec::new(),
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        self.mode.header()
    }

    /// 追加记录
    pub fn push(&mut self, record: PeakRecord) {
        debug_assert_eq!(record.indices.len(), self.mode.arity());
        self.records.push(record);
    }

    pub fn records(&self) -> &[PeakRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 数据行（不含表头）
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records.iter().map(PeakRecord::fields)
    }
}
