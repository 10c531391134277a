//! # 参考反射表解析器
//!
//! 逐行读取 `QC.csv` / `AC11.csv` 参考表，产出候选反射序列。
//!
//! ## 表格式说明
//! ```text
//! # 注释行（首字段以 # 开头）跳过
//! 1,0,0,0,0,0
//! 1,1,0,0,0,0
//! ```
//! - 无表头，首个非注释行即为数据
//! - 列数必须等于模式的指数个数（6 或 3）
//! - 每个字段必须是有限数值
//!
//! ## 依赖关系
//! - 被 `commands/xpeak.rs` 使用
//! - 使用 `models/reflection.rs`
//! - 使用 `csv` 库读取

use crate::error::{QcError, Result};
use crate::models::{Reflection, StructureMode};

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// 惰性、有限、不可重启的反射序列
///
/// 遇到表尾或错误后立即释放底层读取器。
pub struct ReflectionReader<R: Read> {
    reader: Option<csv::Reader<R>>,
    mode: StructureMode,
    source: String,
}

impl ReflectionReader<BufReader<File>> {
    /// 打开参考表文件
    pub fn open(path: &Path, mode: StructureMode) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => QcError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => QcError::FileReadError {
                path: path.display().to_string(),
                source: e,
            },
        })?;

        log::debug!("opened reference table {} ({})", path.display(), mode);
        Ok(Self::from_reader(
            BufReader::new(file),
            mode,
            &path.display().to_string(),
        ))
    }
}

impl<R: Read> ReflectionReader<R> {
    /// 从任意输入流创建，`source` 仅用于错误信息
    pub fn from_reader(reader: R, mode: StructureMode, source: &str) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        ReflectionReader {
            reader: Some(reader),
            mode,
            source: source.to_string(),
        }
    }

    fn parse_record(&self, record: &StringRecord) -> Result<Reflection> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != self.mode.arity() {
            return Err(QcError::TableFormat {
                path: self.source.clone(),
                line,
                reason: format!(
                    "expected {} indices for {} mode, found {}",
                    self.mode.arity(),
                    self.mode,
                    record.len()
                ),
            });
        }

        let mut labels = Vec::with_capacity(record.len());
        let mut indices = Vec::with_capacity(record.len());
        for field in record.iter() {
            let value = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| QcError::TableFormat {
                    path: self.source.clone(),
                    line,
                    reason: format!("index '{}' is not a number", field),
                })?;
            labels.push(field.to_string());
            indices.push(value);
        }

        Ok(Reflection::new(labels, indices))
    }
}

/// 注释行或全空行
fn is_skippable(record: &StringRecord) -> bool {
    match record.get(0) {
        Some(first) if first.starts_with('#') => true,
        _ => record.iter().all(|f| f.is_empty()),
    }
}

impl<R: Read> Iterator for ReflectionReader<R> {
    type Item = Result<Reflection>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut record = StringRecord::new();

        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => {
                    self.reader = None;
                    return None;
                }
                Err(e) => {
                    self.reader = None;
                    return Some(Err(QcError::CsvError(e)));
                }
            }

            if is_skippable(&record) {
                log::debug!("skipping comment row in {}", self.source);
                continue;
            }

            let parsed = self.parse_record(&record);
            if parsed.is_err() {
                self.reader = None;
            }
            return Some(parsed);
        }
    }
}
