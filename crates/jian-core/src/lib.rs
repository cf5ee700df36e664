//! # jian-core
//!
//! Jian 文件格式鉴定框架核心库, 提供基础类型定义、错误处理和工具函数.
//!
//! 本 crate 为整个 Jian 框架提供底层基础设施: 统一错误类型、
//! 占位符值、三态完好性判定与流类型定义.

pub mod checksum;
pub mod error;
pub mod stream_type;
pub mod value;
pub mod wellformed;

// 重导出常用类型
pub use checksum::{Algorithm, checksum};
pub use error::{JianError, JianResult};
pub use stream_type::StreamType;
pub use value::{UNAP, UNAV, is_concrete, is_unap, is_unav};
pub use wellformed::WellFormedness;
