//! 数字保存评级结果.

use std::fmt;

use jian_core::UNAV;

/// 数字保存评级
///
/// 评级只回答一个问题: 这个格式适不适合长期保存.
/// 与完好性正交, 损坏的推荐格式照样评 `Recommended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    /// 推荐的保存格式
    Recommended,
    /// 可接受但不推荐的保存格式
    Acceptable,
    /// 不可接受的保存格式
    Unacceptable,
    /// 评级不可得 (刮取尚未执行或文件缺失)
    Unav,
}

impl Grade {
    /// 机器可读标签
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Acceptable => "acceptable",
            Self::Unacceptable => "unacceptable",
            Self::Unav => UNAV,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
