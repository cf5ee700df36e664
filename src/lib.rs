//! # Jian (鉴)
//!
//! 纯 Rust 实现的文件格式鉴定与数字保存评级框架,
//! 对标 file(1) 与 JHOVE 工具链.
//!
//! Jian 对单个文件回答四个问题:
//! - **识别**: 这是什么格式, 什么版本
//! - **校验**: 文件符不符合其格式的结构规则
//! - **元数据**: 文件里有哪些流, 各自的技术参数
//! - **评级**: 这个格式适不适合长期保存
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use jian::scrape::FileScraper;
//!
//! let mut scraper = FileScraper::new("archive/report.pdf");
//! scraper.scrape(true);
//! println!(
//!     "{} {} {}",
//!     scraper.mimetype(),
//!     scraper.well_formed(),
//!     jian::grade::grade_scraper(&scraper)
//! );
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `jian-core` | 核心类型与工具 |
//! | `jian-detect` | 格式检测器链 |
//! | `jian-scrape` | 刮取器框架与结果聚合 |
//! | `jian-grade` | 数字保存评级 |

/// 核心类型与工具
pub use jian_core as core;

/// 格式检测器链
pub use jian_detect as detect;

/// 刮取器框架与结果聚合
pub use jian_scrape as scrape;

/// 数字保存评级
pub use jian_grade as grade;

pub mod logging;

/// 获取 Jian 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 创建已注册所有内置刮取器的注册表
pub fn default_scraper_registry() -> jian_scrape::ScraperRegistry {
    let mut registry = jian_scrape::ScraperRegistry::new();
    jian_scrape::register_all_scrapers(&mut registry);
    registry
}

/// 创建带内置检测器的检测器链
pub fn default_detector_chain() -> jian_detect::DetectorChain {
    jian_detect::DetectorChain::with_default_detectors()
}
