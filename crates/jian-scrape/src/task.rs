//! 刮取任务定义.
//!
//! 一次刮取请求的不可变输入: 文件路径、预定义格式、校验模式
//! 与配置选项. 每个请求创建一次, 创建后只读.

use std::path::{Path, PathBuf};

use jian_core::UNAV;

/// 刮取配置选项
///
/// 调用方可识别的额外选项. 未设置的选项即 "无此要求".
#[derive(Debug, Clone, Default)]
pub struct ScrapeParams {
    /// 强制使用的字符集 (跳过字符集检测)
    pub charset: Option<String>,
    /// CSV 分隔符
    pub delimiter: Option<String>,
    /// Schematron 模式文件: 出现时 XML 通用刮取器让位于
    /// 模式校验刮取器
    pub schematron: Option<PathBuf>,
}

/// 刮取任务
///
/// 绑定到一个文件的工作单元输入. 其中 `mimetype`/`version`
/// 是交给刮取器的预定格式 (调用方预定义值与检测结果的合并),
/// 不是刮取结论.
#[derive(Debug, Clone)]
pub struct FileTask {
    /// 文件路径; 缺失是合法输入, 由下游记录为错误
    pub path: Option<PathBuf>,
    /// 预定 MIME 类型
    pub mimetype: Option<String>,
    /// 预定格式版本
    pub version: Option<String>,
    /// true 为完整完好性检查, false 为仅识别与元数据刮取
    pub check_wellformed: bool,
    /// 配置选项
    pub params: ScrapeParams,
}

impl FileTask {
    /// 创建默认任务 (完整检查, 无预定格式)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            mimetype: None,
            version: None,
            check_wellformed: true,
            params: ScrapeParams::default(),
        }
    }

    /// 文件路径 (借用形式)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 预定 MIME 类型, 缺省为 `(:unav)`
    pub fn mimetype_or_unav(&self) -> &str {
        self.mimetype.as_deref().unwrap_or(UNAV)
    }

    /// 预定版本, 缺省为 `(:unav)`
    pub fn version_or_unav(&self) -> &str {
        self.version.as_deref().unwrap_or(UNAV)
    }
}
