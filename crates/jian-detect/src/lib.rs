//! # jian-detect
//!
//! Jian 框架文件格式检测库, 提供 (mimetype, version) 自动识别.
//!
//! 检测器按固定优先级组成检测链: 内容签名检测器先行,
//! 扩展名检测器兜底. 链在第一个给出确定 mimetype 的检测器处停止.

pub mod chain;
pub mod detector;
pub mod extension;
pub mod signature;

// 重导出常用类型
pub use chain::DetectorChain;
pub use detector::{Detection, Detector};
pub use extension::ExtensionDetector;
pub use signature::SignatureDetector;
