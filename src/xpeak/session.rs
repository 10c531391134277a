//! # 交互式指标化会话
//!
//! 对每个候选反射：显示预测角，读取一行观测角，校验后记录或跳过。
//!
//! ## 状态机
//! ```text
//! AwaitingReflection -> PredictingAngle -> AwaitingObservation
//!        ^                                   |    |        |
//!        |            (非数值, Retry) <------+    |        |
//!        +------------ Skipping <--- (空行) ------+        |
//!        +------------ Recording <-- (数值) ---------------+
//! 反射序列耗尽或输入结束 -> Done
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/xpeak.rs` 调用
//! - 使用 `xpeak/geometry.rs` 计算
//! - 使用 `models/` 的 PeakTable, PeakRecord

use crate::error::{QcError, Result};
use crate::models::{Config, PeakRecord, PeakTable, Reflection};
use crate::utils::output;
use crate::xpeak::geometry::{self, PeakCalculator};

use std::io::{BufRead, Write};

/// 一行操作者输入的解释结果
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// 空行：未观测到峰
    Blank,
    /// 有效角度及其原文
    Angle { value: f64, text: String },
    /// 无法解析为有限数值
    Invalid,
    /// 输入结束（含无换行的残行）
    EndOfInput,
}

impl Observation {
    /// 解释一行完整输入（不含换行符）
    pub fn parse(line: &str) -> Self {
        let text = line.trim();
        if text.is_empty() {
            return Observation::Blank;
        }

        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Observation::Angle {
                value,
                text: text.to_string(),
            },
            _ => Observation::Invalid,
        }
    }
}

/// 从输入读取一行观测
///
/// 非 UTF-8 的行按无效输入处理；其他读取错误视同输入结束，已记录的峰不会丢失。
pub fn read_observation<I: BufRead>(input: &mut I) -> Observation {
    let mut buf = Vec::new();
    match input.read_until(b'\n', &mut buf) {
        Ok(0) => Observation::EndOfInput,
        Ok(_) if !buf.ends_with(b"\n") => {
            log::debug!("discarding unterminated input line {:?}", buf);
            Observation::EndOfInput
        }
        Ok(_) => match std::str::from_utf8(&buf) {
            Ok(line) => Observation::parse(line),
            Err(e) => {
                log::debug!("input line is not valid UTF-8: {}", e);
                Observation::Invalid
            }
        },
        Err(e) => {
            log::warn!("failed to read observation, ending session: {}", e);
            Observation::EndOfInput
        }
    }
}

enum SessionState {
    AwaitingReflection,
    PredictingAngle(Reflection),
    AwaitingObservation { reflection: Reflection, norm: f64 },
    Recording {
        reflection: Reflection,
        norm: f64,
        angle: f64,
        text: String,
    },
    Skipping(Reflection),
    Done,
}

/// 指标化会话
pub struct IndexingSession<'a, S> {
    config: &'a Config,
    calculator: PeakCalculator,
    reflections: S,
}

impl<'a, S> IndexingSession<'a, S>
where
    S: Iterator<Item = Result<Reflection>>,
{
    pub fn new(config: &'a Config, reflections: S) -> Self {
        IndexingSession {
            config,
            calculator: PeakCalculator::new(config),
            reflections,
        }
    }

    /// 运行会话直至 Done，返回累积的峰位表
    ///
    /// 只有参考表读取错误或终端写入错误会中止会话。
    pub fn run<I: BufRead, W: Write>(mut self, mut input: I, mut out: W) -> Result<PeakTable> {
        let mut table = PeakTable::new(self.config.mode);
        let mut state = SessionState::AwaitingReflection;

        loop {
            state = match state {
                SessionState::AwaitingReflection => match self.reflections.next() {
                    Some(reflection) => SessionState::PredictingAngle(reflection?),
                    None => SessionState::Done,
                },
                SessionState::PredictingAngle(reflection) => {
                    let norm = geometry::reciprocal_norm(self.config.mode, &reflection);
                    self.prompt(&reflection, norm, &mut out)?;
                    SessionState::AwaitingObservation { reflection, norm }
                }
                SessionState::AwaitingObservation { reflection, norm } => {
                    match read_observation(&mut input) {
                        Observation::Blank => SessionState::Skipping(reflection),
                        Observation::Angle { value, text } => SessionState::Recording {
                            reflection,
                            norm,
                            angle: value,
                            text,
                        },
                        Observation::Invalid => {
                            write!(out, "Retry: ").map_err(QcError::Terminal)?;
                            out.flush().map_err(QcError::Terminal)?;
                            SessionState::AwaitingObservation { reflection, norm }
                        }
                        Observation::EndOfInput => {
                            // 结束提示行
                            writeln!(out).map_err(QcError::Terminal)?;
                            SessionState::Done
                        }
                    }
                }
                SessionState::Recording {
                    reflection,
                    norm,
                    angle,
                    text,
                } => {
                    let record = self.derive(&reflection, norm, angle, &text, &mut out)?;
                    table.push(record);
                    SessionState::AwaitingReflection
                }
                SessionState::Skipping(reflection) => {
                    log::debug!("no peak recorded for {}", reflection);
                    SessionState::AwaitingReflection
                }
                SessionState::Done => break,
            };
        }

        log::debug!("session finished with {} peaks", table.len());
        Ok(table)
    }

    /// 输出 `(h, k, l) ~θ: ` 提示
    fn prompt<W: Write>(&self, reflection: &Reflection, norm: f64, out: &mut W) -> Result<()> {
        match self.calculator.predicted_angle(norm) {
            Ok(angle) => write!(out, "{} ~{:.2}: ", reflection, angle),
            Err(e) => {
                let warning = format!("predicted angle undefined for {}: {}", reflection, e);
                writeln!(out, "{}", output::warning_line(&warning))
                    .and_then(|_| write!(out, "{} ~?: ", reflection))
            }
        }
        .and_then(|_| out.flush())
        .map_err(QcError::Terminal)
    }

    /// 由观测角计算 NR 与晶格常数；失败值单独报告
    fn derive<W: Write>(
        &self,
        reflection: &Reflection,
        norm: f64,
        angle: f64,
        text: &str,
        out: &mut W,
    ) -> Result<PeakRecord> {
        let nr = geometry::nelson_riley(angle);
        let lattice_constant = self.calculator.inverse_lattice_constant(norm, angle);

        for (name, value) in [("NR", &nr), ("lattice constant", &lattice_constant)] {
            if let Err(e) = value {
                let warning = format!("{} undefined for {} at {}: {}", name, reflection, text, e);
                writeln!(out, "{}", output::warning_line(&warning)).map_err(QcError::Terminal)?;
            }
        }

        Ok(PeakRecord::new(reflection, text, nr, lattice_constant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::models::StructureMode;
    use crate::utils::format::format_decimal;
    use std::io::Cursor;

    fn crystal_config() -> Config {
        Config::new(1.540593, 4.0, StructureMode::Crystal).unwrap()
    }

    fn run_session(
        config: &Config,
        reflections: Vec<Reflection>,
        input: &str,
    ) -> (Result<PeakTable>, String) {
        let mut out = Vec::new();
        let session = IndexingSession::new(config, reflections.into_iter().map(Ok));
        let table = session.run(Cursor::new(input.as_bytes()), &mut out);
        (table, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_observation_parse() {
        assert_eq!(Observation::parse(""), Observation::Blank);
        assert_eq!(Observation::parse("  \r\n"), Observation::Blank);
        assert_eq!(Observation::parse("abc\n"), Observation::Invalid);
        assert_eq!(Observation::parse("NaN\n"), Observation::Invalid);
        assert_eq!(
            Observation::parse(" 38.5\r\n"),
            Observation::Angle {
                value: 38.5,
                text: "38.5".to_string()
            }
        );
    }

    #[test]
    fn test_read_observation_unterminated_line() {
        let mut input = Cursor::new("38.5".as_bytes());
        assert_eq!(read_observation(&mut input), Observation::EndOfInput);
    }

    #[test]
    fn test_read_observation_non_utf8_line_is_invalid() {
        let mut input = Cursor::new(vec![0xff, 0xfe, b'\n', b'2', b'0', b'\n']);
        assert_eq!(read_observation(&mut input), Observation::Invalid);
        assert_eq!(
            read_observation(&mut input),
            Observation::Angle {
                value: 20.0,
                text: "20".to_string()
            }
        );
    }

    #[test]
    fn test_non_utf8_input_retries_same_reflection() {
        let config = crystal_config();
        let reflections = vec![
            Reflection::from_indices(&[1, 0, 0]),
            Reflection::from_indices(&[1, 1, 0]),
        ];
        let mut input = vec![0xff, 0xfe, b'\n'];
        input.extend_from_slice(b"20\n30\n");

        let mut out = Vec::new();
        let session = IndexingSession::new(&config, reflections.into_iter().map(Ok));
        let table = session.run(Cursor::new(input), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(out.matches("Retry: ").count(), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].indices, vec!["1", "0", "0"]);
        assert_eq!(table.records()[0].observed, "20");
        assert_eq!(table.records()[1].observed, "30");
    }

    #[test]
    fn test_crystal_scenario() {
        let config = crystal_config();
        let reflections = vec![
            Reflection::from_indices(&[1, 0, 0]),
            Reflection::from_indices(&[1, 1, 0]),
        ];
        let (table, out) = run_session(&config, reflections, "38.5\n\n");
        let table = table.unwrap();

        assert_eq!(table.len(), 1);
        let row = table.rows().next().unwrap();
        let r = 38.5_f64.to_radians();
        let i = r.cos().powi(2);
        assert_eq!(row[..4], ["1", "0", "0", "38.5"]);
        assert_eq!(row[4], format_decimal(i / r.sin() + i / r));
        assert_eq!(row[5], format_decimal(1.540593 / 2.0 / r.sin()));

        // 两个反射都给出了提示
        assert!(out.contains("(1, 0, 0) ~11.10: "));
        assert!(out.contains("(1, 1, 0) ~"));
    }

    #[test]
    fn test_blank_lines_never_record() {
        let config = crystal_config();
        let reflections = vec![
            Reflection::from_indices(&[1, 0, 0]),
            Reflection::from_indices(&[1, 1, 0]),
            Reflection::from_indices(&[1, 1, 1]),
        ];
        let (table, _) = run_session(&config, reflections, "\n\n\n");
        assert!(table.unwrap().is_empty());
    }

    #[test]
    fn test_invalid_input_retries_same_reflection() {
        let config = crystal_config();
        let reflections = vec![
            Reflection::from_indices(&[1, 0, 0]),
            Reflection::from_indices(&[1, 1, 0]),
        ];
        let (table, out) = run_session(&config, reflections, "abc\nx1\n20\n30\n");
        let table = table.unwrap();

        assert_eq!(out.matches("Retry: ").count(), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].indices, vec!["1", "0", "0"]);
        assert_eq!(table.records()[0].observed, "20");
        assert_eq!(table.records()[1].indices, vec!["1", "1", "0"]);
        assert_eq!(table.records()[1].observed, "30");
    }

    #[test]
    fn test_end_of_input_keeps_accumulated_records() {
        let config = crystal_config();
        let reflections = vec![
            Reflection::from_indices(&[1, 0, 0]),
            Reflection::from_indices(&[1, 1, 0]),
            Reflection::from_indices(&[1, 1, 1]),
        ];
        // 第二行无换行，不得提交
        let (table, out) = run_session(&config, reflections, "20\n30");
        let table = table.unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].observed, "20");
        assert!(!out.contains("(1, 1, 1)"));
    }

    #[test]
    fn test_quasicrystal_zero_reflection_division_by_zero() {
        let config = Config::new(1.540593, 5.2, StructureMode::Quasicrystal).unwrap();
        let reflections = vec![
            Reflection::from_indices(&[0, 0, 0, 0, 0, 0]),
            Reflection::from_indices(&[1, 0, 0, 0, 0, 0]),
        ];
        let (table, out) = run_session(&config, reflections, "0\n20\n");
        let table = table.unwrap();

        assert!(out.contains("(0, 0, 0, 0, 0, 0) ~0.00: "));
        assert!(out.contains("NR undefined"));
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.records()[0].nr,
            Err(DomainError::DivisionByZero { angle: 0.0 })
        );
        // 会话继续处理下一个反射
        assert!(table.records()[1].nr.is_ok());
        assert_eq!(table.rows().next().unwrap()[7], "");
    }

    #[test]
    fn test_undefined_prediction_still_prompts() {
        let config = Config::new(1.540593, 0.5, StructureMode::Crystal).unwrap();
        let reflections = vec![Reflection::from_indices(&[2, 2, 2])];
        let (table, out) = run_session(&config, reflections, "60\n");

        assert!(out.contains("predicted angle undefined"));
        assert!(out.contains("(2, 2, 2) ~?: "));
        assert_eq!(table.unwrap().len(), 1);
    }

    #[test]
    fn test_table_error_aborts_session() {
        let config = crystal_config();
        let reflections = vec![
            Ok(Reflection::from_indices(&[1, 0, 0])),
            Err(QcError::TableFormat {
                path: "AC11.csv".to_string(),
                line: 2,
                reason: "bad row".to_string(),
            }),
        ];
        let mut out = Vec::new();
        let session = IndexingSession::new(&config, reflections.into_iter());
        let result = session.run(Cursor::new("20\n".as_bytes()), &mut out);

        assert!(matches!(result, Err(QcError::TableFormat { .. })));
    }
}
