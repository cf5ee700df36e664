//! 文本文件刮取器.
//!
//! 检测或验证文本文件的字符集: 调用方通过 `charset` 选项强制
//! 指定时只做解码验证, 否则按 BOM 与内容推断. 解码失败、出现
//! NUL 字节或空文件都记录为错误.

use encoding_rs::Encoding;
use jian_core::{StreamType, UNAP, UNAV};

use crate::charset;
use crate::metadata::{FormatSupport, StreamMetadata};
use crate::registry::{ScraperEntry, ScraperFactory};
use crate::scraper::{ScrapeState, Scraper, SupportTolerance};
use crate::task::FileTask;

/// 支持的格式范围
const SUPPORTED: &[FormatSupport] = &[
    FormatSupport::new("text/plain", &[UNAP]),
    FormatSupport::new("text/csv", &[UNAP]),
    FormatSupport::new("text/xml", &["1.0", "1.1"]),
    FormatSupport::new("text/html", &["4.01", "5.0", "5.1", "5.2"]),
    FormatSupport::new("application/xhtml+xml", &["1.0", "1.1", "5.0"]),
];

/// 文本文件刮取器
pub struct TextfileScraper {
    state: ScrapeState,
}

impl TextfileScraper {
    /// 创建实例 (工厂函数)
    pub fn create(task: FileTask) -> Box<dyn Scraper> {
        Box::new(Self {
            state: ScrapeState::new(task),
        })
    }

    /// 推断或验证字符集, 返回字符集名称
    fn resolve_charset(&mut self, data: &[u8]) -> Option<String> {
        // 调用方强制指定: 归一标签后只验证可解码性
        if let Some(forced) = self.state.task.params.charset.as_deref() {
            let forced = charset::normalize_label(forced);
            // encoding_rs 不含 UTF-32, 只按 BOM 验证
            if forced == "UTF-32" {
                if data.starts_with(b"\xFF\xFE\x00\x00")
                    || data.starts_with(b"\x00\x00\xFE\xFF")
                {
                    return Some(forced);
                }
                self.state
                    .error(format!("文件内容无法用字符集 {forced} 解码"));
                return None;
            }
            let Some(encoding) = Encoding::for_label(forced.as_bytes()) else {
                self.state.error(format!("未知字符集: {forced}"));
                return None;
            };
            let (_, _, had_errors) = encoding.decode(data);
            if had_errors {
                self.state
                    .error(format!("文件内容无法用字符集 {forced} 解码"));
                return None;
            }
            return Some(forced);
        }

        // BOM 优先
        if data.starts_with(b"\xFF\xFE\x00\x00") || data.starts_with(b"\x00\x00\xFE\xFF") {
            return Some("UTF-32".to_owned());
        }
        if let Some((encoding, _)) = Encoding::for_bom(data) {
            if encoding == encoding_rs::UTF_8 {
                return Some("UTF-8".to_owned());
            }
            return Some("UTF-16".to_owned());
        }

        // XML 声明的编码优先于内容推断 (纯 ASCII 内容在多种
        // 字符集下都能解码, 以声明为准)
        if let Some(declared) = charset::xml_declared_encoding(data) {
            if let Some(encoding) = Encoding::for_label(declared.as_bytes()) {
                let (_, _, had_errors) = encoding.decode(data);
                if !had_errors {
                    return Some(declared);
                }
                self.state
                    .error(format!("文件内容无法用声明的字符集 {declared} 解码"));
                return None;
            }
        }

        // 无 BOM: 先试 UTF-8, 再退 ISO-8859-15
        if std::str::from_utf8(data).is_ok() {
            return Some("UTF-8".to_owned());
        }
        if data.contains(&0) {
            self.state.error("文本内容包含 NUL 字节".to_owned());
            return None;
        }
        Some("ISO-8859-15".to_owned())
    }
}

impl Scraper for TextfileScraper {
    fn name(&self) -> &'static str {
        "TextfileScraper"
    }

    fn scrape(&mut self) {
        let data = match self.state.task.path() {
            None => {
                self.state.error("未给出文件名".to_owned());
                self.state.ensure_stream();
                return;
            }
            Some(path) => match std::fs::read(path) {
                Ok(data) => data,
                Err(err) => {
                    self.state.error(format!("读取文件失败: {err}"));
                    self.state.ensure_stream();
                    return;
                }
            },
        };

        if data.is_empty() {
            self.state.error("空文件".to_owned());
            self.state.ensure_stream();
            return;
        }

        let charset = self.resolve_charset(&data);

        let mimetype = match &self.state.task.mimetype {
            Some(mime) => mime.clone(),
            None => "text/plain".to_owned(),
        };
        let version = match &self.state.task.version {
            Some(version) => version.clone(),
            // 纯文本与 CSV 没有版本概念
            None if mimetype == "text/plain" || mimetype == "text/csv" => UNAP.to_owned(),
            None => UNAV.to_owned(),
        };

        let mut stream = StreamMetadata::new(0, mimetype, version, Some(StreamType::Text));
        if let Some(charset) = charset {
            self.state
                .message(format!("字符集 {charset} 验证通过"));
            stream.set_attr("charset", charset);
        }
        self.state.streams.push(stream);

        self.state
            .check_supported(SUPPORTED, SupportTolerance::LOOSE_VERSION);
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }
}

/// 注册条目
pub fn entry() -> ScraperEntry {
    ScraperEntry {
        name: "TextfileScraper",
        only_wellformed: false,
        supported: SUPPORTED,
        extra_filter: None,
        factory: TextfileScraper::create as ScraperFactory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jian_core::WellFormedness;
    use std::io::Write;

    fn scrape(data: &[u8], charset: Option<&str>) -> Box<dyn Scraper> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(data).unwrap();
        drop(f);

        let mut task = FileTask::new(&path);
        task.mimetype = Some("text/plain".to_owned());
        task.params.charset = charset.map(str::to_owned);
        let mut scraper = TextfileScraper::create(task);
        scraper.scrape();
        scraper
    }

    #[test]
    fn test_utf8_文本() {
        let scraper = scrape("你好, world".as_bytes(), None);
        assert_eq!(scraper.well_formed(), WellFormedness::WellFormed);
        let stream = &scraper.streams()[0];
        assert_eq!(stream.attr("charset"), Some("UTF-8"));
        assert_eq!(stream.version, UNAP);
    }

    #[test]
    fn test_latin_文本退回_iso8859() {
        let scraper = scrape(b"caf\xE9 au lait", None);
        assert_eq!(scraper.well_formed(), WellFormedness::WellFormed);
        assert_eq!(scraper.streams()[0].attr("charset"), Some("ISO-8859-15"));
    }

    #[test]
    fn test_空文件记录错误() {
        let scraper = scrape(b"", None);
        assert_eq!(scraper.well_formed(), WellFormedness::NotWellFormed);
        assert!(scraper.errors().iter().any(|e| e.contains("空文件")));
    }

    #[test]
    fn test_二进制内容记录错误() {
        let scraper = scrape(b"\x00\x01\x02\xFF\xFE\x00", None);
        assert_eq!(scraper.well_formed(), WellFormedness::NotWellFormed);
    }

    #[test]
    fn test_强制字符集标签被归一() {
        let scraper = scrape("你好".as_bytes(), Some("utf-8"));
        assert_eq!(scraper.well_formed(), WellFormedness::WellFormed);
        assert_eq!(scraper.streams()[0].attr("charset"), Some("UTF-8"));
    }

    #[test]
    fn test_xml_声明的编码优先于内容推断() {
        // 纯 ASCII 内容, 但声明为 ISO-8859-15
        let scraper = scrape(
            b"<?xml version=\"1.0\" encoding=\"iso-8859-15\"?><root/>",
            None,
        );
        assert_eq!(scraper.well_formed(), WellFormedness::WellFormed);
        assert_eq!(scraper.streams()[0].attr("charset"), Some("ISO-8859-15"));
    }

    #[test]
    fn test_强制字符集验证失败() {
        // 0xE9 单独出现不是合法 UTF-8
        let scraper = scrape(b"caf\xE9", Some("UTF-8"));
        assert_eq!(scraper.well_formed(), WellFormedness::NotWellFormed);
        assert!(
            scraper
                .errors()
                .iter()
                .any(|e| e.contains("无法用字符集"))
        );
    }
}
