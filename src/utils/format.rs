//! # 数值格式化
//!
//! CSV 与终端输出共用的十进制序列化。
//!
//! ## 依赖关系
//! - 被 `models/peak.rs`、`commands/xpeak.rs` 使用
//! - 无外部模块依赖

/// 最短可往返的十进制表示
///
/// 不固定精度、不保留末尾零、不使用科学计数法，如 `1.0` -> `"1"`，
/// `0.25` -> `"0.25"`，`1e-7` -> `"0.0000001"`。
pub fn format_decimal(value: f64) -> String {
    // f64 的 Display 即最短往返表示，且从不输出指数形式
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_decimal_shortest() {
        assert_eq!(format_decimal(1.0), "1");
        assert_eq!(format_decimal(4.0), "4");
        assert_eq!(format_decimal(38.5), "38.5");
        assert_eq!(format_decimal(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_format_decimal_no_exponent() {
        assert_eq!(format_decimal(1e-7), "0.0000001");
        assert_eq!(format_decimal(1e21), "1000000000000000000000");
    }

    #[test]
    fn test_format_decimal_round_trips() {
        for v in [3.998_765_432_1, 1.540593, 2.0_f64.sqrt(), 123456.789e-3] {
            let parsed: f64 = format_decimal(v).parse().unwrap();
            assert_eq!(parsed, v);
        }
    }
}
