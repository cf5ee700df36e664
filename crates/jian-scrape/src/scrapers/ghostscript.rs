//! Ghostscript PDF 完好性刮取器.
//!
//! 以 nullpage 设备渲染整份文档验证 PDF 结构. Ghostscript 的
//! 退出码不可靠: 某些损坏文档照样以 0 退出, 只在标准输出里
//! 打印 `**** Error` / `**** Warning` 标记, 必须逐行扫描.

use jian_core::{UNAV, WellFormedness};

use crate::metadata::{FormatSupport, StreamMetadata};
use crate::registry::{ScraperEntry, ScraperFactory};
use crate::scraper::{ScrapeState, Scraper, SupportTolerance};
use crate::shell;
use crate::task::FileTask;

/// 支持的格式范围
const SUPPORTED: &[FormatSupport] = &[FormatSupport::new(
    "application/pdf",
    &[
        "1.7", "A-1a", "A-1b", "A-2a", "A-2b", "A-2u", "A-3a", "A-3b", "A-3u",
    ],
)];

/// Ghostscript 刮取器
pub struct GhostscriptScraper {
    state: ScrapeState,
}

impl GhostscriptScraper {
    /// 创建实例 (工厂函数)
    pub fn create(task: FileTask) -> Box<dyn Scraper> {
        Box::new(Self {
            state: ScrapeState::new(task),
        })
    }
}

impl Scraper for GhostscriptScraper {
    fn name(&self) -> &'static str {
        "GhostscriptScraper"
    }

    fn scrape(&mut self) {
        let Some(path) = self.state.task.path().map(std::path::Path::to_owned) else {
            self.state.error("未给出文件名".to_owned());
            self.state.ensure_stream();
            return;
        };

        let result = match shell::run_on_file(
            "gs",
            &["-o", "/dev/null", "-sDEVICE=nullpage", "-f"],
            &path,
        ) {
            Ok(result) => result,
            Err(err) => {
                self.state.error(format!("无法启动 gs: {err}"));
                self.state.ensure_stream();
                return;
            }
        };

        if !result.stderr.is_empty() {
            self.state.error(result.stderr.clone());
        }
        if !result.success() && self.state.errors.is_empty() {
            self.state
                .error(format!("gs 以非零退出码 {} 退出", result.returncode));
        }
        if !result.stdout.is_empty() {
            self.state.message(result.stdout);
        }
        if self.state.errors.is_empty() && self.state.messages.is_empty() {
            self.state.message("PDF 渲染验证通过".to_owned());
        }

        let mimetype = self
            .state
            .task
            .mimetype
            .clone()
            .unwrap_or_else(|| "application/pdf".to_owned());
        let version = self
            .state
            .task
            .version
            .clone()
            .unwrap_or_else(|| UNAV.to_owned());
        self.state
            .streams
            .push(StreamMetadata::new(0, mimetype, version, None));

        self.state
            .check_supported(SUPPORTED, SupportTolerance::LOOSE_VERSION);
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }

    fn well_formed(&self) -> WellFormedness {
        // 退出码为 0 也可能失败, 标准输出里的错误标记同样作数
        if has_output_marker(&self.state.messages) {
            return WellFormedness::NotWellFormed;
        }
        self.state.default_well_formed()
    }
}

/// 扫描标准输出里的 Ghostscript 错误/警告标记
fn has_output_marker(messages: &[String]) -> bool {
    messages.iter().any(|msg| {
        msg.lines().any(|line| {
            let line = line.to_ascii_lowercase();
            line.contains("**** error") || line.contains("**** warning")
        })
    })
}

/// 注册条目
pub fn entry() -> ScraperEntry {
    ScraperEntry {
        name: "GhostscriptScraper",
        only_wellformed: true,
        supported: SUPPORTED,
        extra_filter: None,
        factory: GhostscriptScraper::create as ScraperFactory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_输出标记扫描() {
        assert!(has_output_marker(&[
            "Page 1\n   **** Error: Cannot find a crypt filter.\n".to_owned()
        ]));
        assert!(has_output_marker(&[
            "**** WARNING: file has corrupt xref\n".to_owned()
        ]));
        assert!(!has_output_marker(&[
            "Processing pages 1 through 3.\nPage 1\n".to_owned()
        ]));
        // 标记必须出现在行内, 单独的 error 字样不算
        assert!(!has_output_marker(&["no errors found".to_owned()]));
    }

    #[test]
    fn test_标记压制零退出码判定() {
        let mut task = FileTask::new("t.pdf");
        task.mimetype = Some("application/pdf".to_owned());
        task.version = Some("1.7".to_owned());
        let mut scraper = GhostscriptScraper {
            state: ScrapeState::new(task),
        };
        scraper
            .state
            .message("Page 1\n **** Error: stream operator error\n".to_owned());
        scraper.state.streams.push(StreamMetadata::new(
            0,
            "application/pdf",
            "1.7",
            None,
        ));
        assert_eq!(scraper.well_formed(), WellFormedness::NotWellFormed);
    }
}
