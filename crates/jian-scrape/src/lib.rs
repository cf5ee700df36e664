//! # jian-scrape
//!
//! Jian 文件格式鉴定框架的刮取层: 刮取器契约、注册表、
//! 内建刮取器实现与单文件结果聚合器.
//!
//! 典型用法通过 [`FileScraper`] 门面:
//!
//! ```no_run
//! use jian_scrape::FileScraper;
//!
//! let mut scraper = FileScraper::new("archive/report.pdf");
//! scraper.scrape(true);
//! println!("{} {}", scraper.mimetype(), scraper.well_formed());
//! ```

pub mod aggregator;
pub mod charset;
pub mod metadata;
pub mod registry;
pub mod scraper;
pub mod scrapers;
pub mod shell;
pub mod task;

// 重导出常用类型
pub use aggregator::{FileScraper, ScraperInfo};
pub use metadata::{FormatSupport, StreamMetadata, stream_type_for_mimetype};
pub use registry::{ScraperEntry, ScraperFactory, ScraperRegistry};
pub use scraper::{ScrapeState, Scraper, SupportTolerance};
pub use scrapers::register_all_scrapers;
pub use task::{FileTask, ScrapeParams};
