//! # 峰位表导出
//!
//! 将会话结束后的 `PeakTable` 一次性写为 CSV。
//!
//! 先写入同目录下的临时文件再重命名，失败时删除临时文件，
//! 目标路径上不会留下不完整的表。
//!
//! ## 依赖关系
//! - 被 `commands/xpeak.rs` 调用
//! - 使用 `models/peak.rs` 的 PeakTable
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{QcError, Result};
use crate::models::PeakTable;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// 由输入路径推导输出路径：`data/scan.ras` -> `data/scan_peak.csv`
pub fn peak_csv_path(input: &Path) -> PathBuf {
    let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push("_peak.csv");
    input.with_file_name(name)
}

/// 导出峰位表为 CSV
pub fn write_peak_table(table: &PeakTable, output_path: &Path) -> Result<()> {
    let tmp_path = temp_path(output_path);

    let result = write_csv(table, &tmp_path).and_then(|_| {
        fs::rename(&tmp_path, output_path).map_err(|e| QcError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_csv(table: &PeakTable, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(table.header())?;
    for row in table.rows() {
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(|e| QcError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    if let Some(file_name) = path.file_name() {
        name.push(file_name);
    }
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeakRecord, Reflection, StructureMode};

    #[test]
    fn test_peak_csv_path() {
        assert_eq!(
            peak_csv_path(Path::new("data/scan.ras")),
            PathBuf::from("data/scan_peak.csv")
        );
        assert_eq!(peak_csv_path(Path::new("scan")), PathBuf::from("scan_peak.csv"));
    }

    #[cfg(unix)]
    #[test]
    fn test_peak_csv_path_keeps_non_utf8_stem() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new("data").join(OsStr::from_bytes(b"scan\xff.ras"));
        let expected = Path::new("data").join(OsStr::from_bytes(b"scan\xff_peak.csv"));
        assert_eq!(peak_csv_path(&input), expected);
    }

    #[test]
    fn test_write_crystal_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan_peak.csv");

        let mut table = PeakTable::new(StructureMode::Crystal);
        table.push(PeakRecord::new(
            &Reflection::from_indices(&[1, 0, 0]),
            "38.5",
            Ok(1.5),
            Ok(4.0),
        ));
        write_peak_table(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "h,k,l,2theta,NR,lattice constant\n1,0,0,38.5,1.5,4\n");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_empty_table_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qc_peak.csv");

        write_peak_table(&PeakTable::new(StructureMode::Quasicrystal), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "h,k,l,m,n,o,2theta,NR,lattice constant\n");
    }

    #[test]
    fn test_write_to_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("scan_peak.csv");

        let result = write_peak_table(&PeakTable::new(StructureMode::Crystal), &path);
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
