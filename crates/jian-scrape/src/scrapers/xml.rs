//! XML 完好性刮取器.
//!
//! 基于 quick-xml 做结构完好性检查, 并从 XML 声明读出版本与
//! 字符集. 仅做完好性检查, 仅识别模式下由注册表跳过.
//! 出现 `schematron` 选项时让位于模式校验刮取器.

use std::io::BufReader;

use jian_core::{StreamType, UNAV};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::metadata::{FormatSupport, StreamMetadata};
use crate::registry::{ScraperEntry, ScraperFactory};
use crate::scraper::{ScrapeState, Scraper, SupportTolerance};
use crate::task::{FileTask, ScrapeParams};

/// 支持的格式范围
const SUPPORTED: &[FormatSupport] = &[
    FormatSupport::new("text/xml", &["1.0", "1.1"]),
    FormatSupport::new("application/xhtml+xml", &["1.0", "1.1", "5.0"]),
];

/// XML 完好性刮取器
pub struct XmlScraper {
    state: ScrapeState,
}

impl XmlScraper {
    /// 创建实例 (工厂函数)
    pub fn create(task: FileTask) -> Box<dyn Scraper> {
        Box::new(Self {
            state: ScrapeState::new(task),
        })
    }
}

impl Scraper for XmlScraper {
    fn name(&self) -> &'static str {
        "XmlScraper"
    }

    fn scrape(&mut self) {
        let Some(path) = self.state.task.path().map(std::path::Path::to_owned) else {
            self.state.error("未给出文件名".to_owned());
            self.state.ensure_stream();
            return;
        };

        let file = match std::fs::File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                self.state.error(format!("打开文件失败: {err}"));
                self.state.ensure_stream();
                return;
            }
        };

        let mut reader = Reader::from_reader(BufReader::new(file));
        // 闭合标签必须与开启标签匹配
        reader.config_mut().check_end_names = true;

        let mut declared_version: Option<String> = None;
        let mut declared_encoding: Option<String> = None;
        let mut element_seen = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Decl(decl)) => {
                    if let Ok(version) = decl.version() {
                        declared_version =
                            Some(String::from_utf8_lossy(&version).into_owned());
                    }
                    if let Some(Ok(encoding)) = decl.encoding() {
                        // 声明的标签归一到规范名, 与其他刮取器报告一致
                        declared_encoding = Some(crate::charset::normalize_label(
                            &String::from_utf8_lossy(&encoding),
                        ));
                    }
                }
                Ok(Event::Start(_) | Event::Empty(_)) => element_seen = true,
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    self.state.error(format!(
                        "XML 结构错误 (位置 {}): {err}",
                        reader.buffer_position()
                    ));
                    break;
                }
            }
            buf.clear();
        }

        if !element_seen && self.state.errors.is_empty() {
            self.state.error("文档不含任何 XML 元素".to_owned());
        }
        if self.state.errors.is_empty() {
            self.state.message("XML 结构完好".to_owned());
        }

        let mimetype = self
            .state
            .task
            .mimetype
            .clone()
            .unwrap_or_else(|| "text/xml".to_owned());
        let version = declared_version
            .or_else(|| self.state.task.version.clone())
            .unwrap_or_else(|| UNAV.to_owned());

        let mut stream = StreamMetadata::new(0, mimetype, version, Some(StreamType::Text));
        // 未声明编码的 XML 默认 UTF-8
        stream.set_attr(
            "charset",
            declared_encoding.unwrap_or_else(|| "UTF-8".to_owned()),
        );
        self.state.streams.push(stream);

        self.state
            .check_supported(SUPPORTED, SupportTolerance::LOOSE_VERSION);
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }
}

/// schematron 选项出现时让位
fn no_schematron(params: &ScrapeParams) -> bool {
    params.schematron.is_none()
}

/// 注册条目
pub fn entry() -> ScraperEntry {
    ScraperEntry {
        name: "XmlScraper",
        only_wellformed: true,
        supported: SUPPORTED,
        extra_filter: Some(no_schematron as crate::registry::SupportFilter),
        factory: XmlScraper::create as ScraperFactory,
    }
}
