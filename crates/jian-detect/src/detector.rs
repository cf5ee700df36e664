//! 检测器 trait 定义.
//!
//! 检测器基于文件头部数据和文件名工作, 不直接接触文件系统,
//! 以便在无文件环境下测试.

use jian_core::{UNAV, is_concrete};

/// 一次检测的结果
///
/// 两个字段都可能是 `(:unav)` 占位符: 检测器只提出猜测,
/// 不保证给出具体值.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// 识别出的 MIME 类型
    pub mimetype: String,
    /// 识别出的格式版本
    pub version: String,
}

impl Detection {
    /// 未识别结果 (两个字段均为占位符)
    pub fn unknown() -> Self {
        Self {
            mimetype: UNAV.to_owned(),
            version: UNAV.to_owned(),
        }
    }

    /// 创建带具体值的检测结果
    pub fn new(mimetype: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            mimetype: mimetype.into(),
            version: version.into(),
        }
    }

    /// 是否识别出了具体的 MIME 类型
    pub fn found(&self) -> bool {
        is_concrete(&self.mimetype)
    }
}

/// 格式检测器 trait
///
/// 每个检测器独立检查文件并提出 (mimetype, version) 猜测.
pub trait Detector: Send {
    /// 获取检测器名称 (用于诊断输出)
    fn name(&self) -> &'static str;

    /// 根据文件头部数据与文件名检测格式
    ///
    /// # 参数
    /// - `header`: 文件开头的若干字节 (通常最多 8KB)
    /// - `filename`: 文件名 (可选, 用于扩展名匹配)
    ///
    /// # 返回
    /// 检测结果; 未识别时返回占位符结果, 绝不报错.
    fn detect(&self, header: &[u8], filename: Option<&str>) -> Detection;
}
