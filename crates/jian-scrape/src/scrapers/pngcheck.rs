//! pngcheck 完好性刮取器.
//!
//! 包装 pngcheck 命令行工具校验 PNG 块结构与 CRC. 该工具
//! 不产出格式元数据, 流信息交给后续刮取器补全.

use crate::metadata::FormatSupport;
use crate::registry::{ScraperEntry, ScraperFactory};
use crate::scraper::{ScrapeState, Scraper, SupportTolerance};
use crate::shell;
use crate::task::FileTask;

/// 支持的格式范围
const SUPPORTED: &[FormatSupport] = &[FormatSupport::any_version("image/png")];

/// pngcheck 刮取器
pub struct PngcheckScraper {
    state: ScrapeState,
}

impl PngcheckScraper {
    /// 创建实例 (工厂函数)
    pub fn create(task: FileTask) -> Box<dyn Scraper> {
        Box::new(Self {
            state: ScrapeState::new(task),
        })
    }
}

impl Scraper for PngcheckScraper {
    fn name(&self) -> &'static str {
        "PngcheckScraper"
    }

    fn scrape(&mut self) {
        let Some(path) = self.state.task.path().map(std::path::Path::to_owned) else {
            self.state.error("未给出文件名".to_owned());
            self.state.ensure_stream();
            return;
        };

        let result = match shell::run_on_file("pngcheck", &[], &path) {
            Ok(result) => result,
            Err(err) => {
                self.state.error(format!("无法启动 pngcheck: {err}"));
                self.state.ensure_stream();
                return;
            }
        };

        if result.success() {
            self.state.message(result.stdout);
        } else {
            self.state.error(format!(
                "pngcheck 校验失败 (退出码 {}):\n{}\n{}",
                result.returncode, result.stdout, result.stderr
            ));
        }

        // 占位流, mimetype/version 由签名刮取器产出并合并
        self.state.ensure_stream();
        self.state
            .check_supported(SUPPORTED, SupportTolerance::LOOSE);
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }
}

/// 注册条目
pub fn entry() -> ScraperEntry {
    ScraperEntry {
        name: "PngcheckScraper",
        only_wellformed: true,
        supported: SUPPORTED,
        extra_filter: None,
        factory: PngcheckScraper::create as ScraperFactory,
    }
}
