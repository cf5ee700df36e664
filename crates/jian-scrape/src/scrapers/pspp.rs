//! SPSS Portable 刮取器.
//!
//! 先核对文件头部的 "SPSS PORT FILE" 标签, 再用 pspp-convert
//! 往临时目录做一次真实转换: 转换成功且产物存在才算完好.
//! 临时目录由 RAII 句柄负责清理.

use std::io::Read;

use jian_core::{StreamType, UNAP};

use crate::metadata::{FormatSupport, StreamMetadata};
use crate::registry::{ScraperEntry, ScraperFactory};
use crate::scraper::{ScrapeState, Scraper, SupportTolerance};
use crate::shell;
use crate::task::FileTask;

/// 头部标签出现在前 512 字节内
const PORT_TAG: &[u8] = b"SPSS PORT FILE";
const HEADER_PROBE: usize = 512;

/// 支持的格式范围
const SUPPORTED: &[FormatSupport] = &[FormatSupport::new("application/x-spss-por", &[UNAP])];

/// pspp 刮取器
pub struct PsppScraper {
    state: ScrapeState,
}

impl PsppScraper {
    /// 创建实例 (工厂函数)
    pub fn create(task: FileTask) -> Box<dyn Scraper> {
        Box::new(Self {
            state: ScrapeState::new(task),
        })
    }

    /// 核对头部标签
    fn check_header(&mut self, path: &std::path::Path) -> bool {
        let mut header = vec![0u8; HEADER_PROBE];
        let n = match std::fs::File::open(path).and_then(|mut f| f.read(&mut header)) {
            Ok(n) => n,
            Err(err) => {
                self.state.error(format!("读取文件失败: {err}"));
                return false;
            }
        };
        header.truncate(n);

        if !contains(&header, PORT_TAG) {
            self.state
                .error("文件头部缺少 SPSS PORT FILE 标签".to_owned());
            return false;
        }
        true
    }
}

impl Scraper for PsppScraper {
    fn name(&self) -> &'static str {
        "PsppScraper"
    }

    fn scrape(&mut self) {
        let Some(path) = self.state.task.path().map(std::path::Path::to_owned) else {
            self.state.error("未给出文件名".to_owned());
            self.state.ensure_stream();
            return;
        };

        if !self.check_header(&path) {
            self.state.ensure_stream();
            return;
        }

        let tempdir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => {
                self.state.error(format!("创建临时目录失败: {err}"));
                self.state.ensure_stream();
                return;
            }
        };
        let converted = tempdir.path().join("converted.sav");

        let result = match shell::run(
            "pspp-convert",
            [path.as_os_str(), converted.as_os_str()],
        ) {
            Ok(result) => result,
            Err(err) => {
                self.state.error(format!("无法启动 pspp-convert: {err}"));
                self.state.ensure_stream();
                return;
            }
        };

        if !result.stderr.is_empty() {
            self.state.error(result.stderr.clone());
        }
        if !result.success() && self.state.errors.is_empty() {
            self.state.error(format!(
                "pspp-convert 以非零退出码 {} 退出",
                result.returncode
            ));
        }
        if !converted.is_file() && self.state.errors.is_empty() {
            self.state.error("转换产物未生成".to_owned());
        }
        if self.state.errors.is_empty() {
            self.state.message("SPSS Portable 转换验证通过".to_owned());
        }

        self.state.streams.push(StreamMetadata::new(
            0,
            "application/x-spss-por",
            UNAP,
            Some(StreamType::Binary),
        ));
        self.state
            .check_supported(SUPPORTED, SupportTolerance::LOOSE_VERSION);
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }
}

/// 子序列查找
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// 注册条目
pub fn entry() -> ScraperEntry {
    ScraperEntry {
        name: "PsppScraper",
        only_wellformed: true,
        supported: SUPPORTED,
        extra_filter: None,
        factory: PsppScraper::create as ScraperFactory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jian_core::WellFormedness;
    use std::io::Write;

    #[test]
    fn test_缺少头部标签记录错误() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.por");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"definitely not a portable file").unwrap();
        drop(f);

        let mut task = FileTask::new(&path);
        task.mimetype = Some("application/x-spss-por".to_owned());
        let mut scraper = PsppScraper::create(task);
        scraper.scrape();
        assert_eq!(scraper.well_formed(), WellFormedness::NotWellFormed);
        assert!(
            scraper
                .errors()
                .iter()
                .any(|e| e.contains("SPSS PORT FILE"))
        );
    }

    #[test]
    fn test_子序列查找() {
        assert!(contains(b"xxSPSS PORT FILExx", PORT_TAG));
        assert!(!contains(b"SPSS PORT", PORT_TAG));
    }
}
