//! # 衍射指数
//!
//! 一行参考表即一个候选反射：同时保留原始文本（写入输出表）和数值
//! （用于几何计算）。
//!
//! ## 依赖关系
//! - 被 `parsers/reflections.rs` 构造
//! - 被 `xpeak/` 使用

/// 候选反射 (h,k,l) 或 (h,k,l,m,n,o)
#[derive(Debug, Clone, PartialEq)]
pub struct Reflection {
    labels: Vec<String>,
    indices: Vec<f64>,
}

impl Reflection {
    /// 由文本与数值创建，两者长度必须一致
    pub fn new(labels: Vec<String>, indices: Vec<f64>) -> Self {
        debug_assert_eq!(labels.len(), indices.len());
        Reflection { labels, indices }
    }

    /// 从整数指数创建（文本即其十进制表示）
    #[cfg(test)]
    pub fn from_indices(indices: &[i32]) -> Self {
        Reflection {
            labels: indices.iter().map(|i| i.to_string()).collect(),
            indices: indices.iter().map(|&i| i as f64).collect(),
        }
    }

    /// 原始文本
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// 数值
    pub fn indices(&self) -> &[f64] {
        &self.indices
    }

    pub fn arity(&self) -> usize {
        self.indices.len()
    }
}

impl std::fmt::Display for Reflection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.labels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_labels() {
        let r = Reflection::new(
            vec!["1".into(), "-1".into(), "0".into()],
            vec![1.0, -1.0, 0.0],
        );
        assert_eq!(r.to_string(), "(1, -1, 0)");
        assert_eq!(r.arity(), 3);
    }

    #[test]
    fn test_from_indices() {
        let r = Reflection::from_indices(&[1, 0, 0, -1, 0, 2]);
        assert_eq!(r.labels()[3], "-1");
        assert_eq!(r.indices()[5], 2.0);
        assert_eq!(r.arity(), 6);
    }
}
