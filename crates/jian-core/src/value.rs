//! 占位符值定义.
//!
//! 数字保存领域区分两种 "没有值" 的情形:
//! - `(:unav)`: 值在概念上存在, 但无法确定 (unavailable)
//! - `(:unap)`: 属性对该格式不适用, 例如没有格式版本的格式 (unapplicable)
//!
//! 两者不可混用: "查不出来" 和 "本来就没有" 在后续评级中含义不同.

/// 值存在但无法确定
pub const UNAV: &str = "(:unav)";

/// 属性对该格式不适用
pub const UNAP: &str = "(:unap)";

/// 判断值是否为 "无法确定" 占位符
pub fn is_unav(value: &str) -> bool {
    value == UNAV
}

/// 判断值是否为 "不适用" 占位符
pub fn is_unap(value: &str) -> bool {
    value == UNAP
}

/// 判断值是否为具体值 (非占位符)
pub fn is_concrete(value: &str) -> bool {
    !is_unav(value) && !is_unap(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_占位符判定() {
        assert!(is_unav(UNAV));
        assert!(is_unap(UNAP));
        assert!(!is_concrete(UNAV));
        assert!(!is_concrete(UNAP));
        assert!(is_concrete("application/pdf"));
        assert!(is_concrete(""));
    }
}
