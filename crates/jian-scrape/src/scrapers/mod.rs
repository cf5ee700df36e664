//! 刮取器实现集合.
//!
//! 注册顺序即优先级: 专用完好性工具在前, 通用元数据刮取器
//! 在后, 签名兜底刮取器最末. 流元数据按 "先到者优先" 合并,
//! 专用工具产出的字段优先于兜底刮取器.

pub mod csv;
pub mod dummy;
pub mod ffprobe;
pub mod ghostscript;
pub mod magic;
pub mod pngcheck;
pub mod pspp;
pub mod textfile;
pub mod xml;

use crate::registry::ScraperRegistry;

/// 注册全部内建刮取器
pub fn register_all_scrapers(registry: &mut ScraperRegistry) {
    registry.register(ghostscript::entry());
    registry.register(ffprobe::entry());
    registry.register(pngcheck::entry());
    registry.register(pspp::entry());
    registry.register(csv::entry());
    registry.register(textfile::entry());
    registry.register(xml::entry());
    registry.register(magic::entry());
}
