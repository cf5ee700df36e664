//! 统一错误类型定义.
//!
//! 所有 Jian crate 共用的错误类型, 支持跨模块传播.
//!
//! 注意: 刮取器内部的工具失败不走此类型, 它们被就地转换为
//! 错误字符串并记录到刮取结果中, 以保证单个文件的刮取请求
//! 永远不会因外部工具的异常而整体崩溃.

use thiserror::Error;

/// Jian 框架统一错误类型
#[derive(Debug, Error)]
pub enum JianError {
    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 不支持的操作
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 未找到指定的校验和算法
    #[error("未找到校验和算法: {0}")]
    AlgorithmNotFound(String),

    /// 未找到指定的流
    #[error("未找到流: 索引 {0}")]
    StreamNotFound(usize),

    /// 内部错误 (不应发生)
    #[error("内部错误: {0}")]
    Internal(String),
}

/// Jian 框架统一 Result 类型
pub type JianResult<T> = Result<T, JianError>;
