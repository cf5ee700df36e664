//! 三态完好性判定.
//!
//! "完好" (well-formed) 描述文件是否符合其自身格式的结构规则.
//! 判定是显式三值的: "未判定" 与 "不完好" 下游含义不同,
//! 绝不能把 "未判定" 折叠成 "不完好".

use std::fmt;

/// 完好性判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellFormedness {
    /// 文件符合其格式的结构规则
    WellFormed,
    /// 文件不符合其格式的结构规则
    NotWellFormed,
    /// 本次执行未对完好性做出判定 (仅识别模式, 或检查不适用)
    Undetermined,
}

impl WellFormedness {
    /// 合并两个判定结果.
    ///
    /// 任一 `NotWellFormed` 占优; 否则任一 `WellFormed` 胜出;
    /// 否则保持 `Undetermined`.
    pub fn combine(self, other: WellFormedness) -> WellFormedness {
        match (self, other) {
            (Self::NotWellFormed, _) | (_, Self::NotWellFormed) => Self::NotWellFormed,
            (Self::WellFormed, _) | (_, Self::WellFormed) => Self::WellFormed,
            _ => Self::Undetermined,
        }
    }

    /// 是否已做出判定
    pub fn is_determined(&self) -> bool {
        !matches!(self, Self::Undetermined)
    }
}

impl fmt::Display for WellFormedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WellFormed => "完好",
            Self::NotWellFormed => "不完好",
            Self::Undetermined => "未判定",
        };
        write!(f, "{name}")
    }
}
