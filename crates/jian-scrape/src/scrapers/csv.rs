//! CSV 完好性刮取器.
//!
//! 按调用方给定的分隔符 (`delimiter` 选项, 默认逗号) 解析
//! 整个文件: 支持双引号包围与 `""` 转义, 要求每条记录的字段
//! 数与首行一致. 仅做完好性检查.

use jian_core::{StreamType, UNAP};

use crate::metadata::{FormatSupport, StreamMetadata};
use crate::registry::{ScraperEntry, ScraperFactory};
use crate::scraper::{ScrapeState, Scraper, SupportTolerance};
use crate::task::FileTask;

/// 支持的格式范围
const SUPPORTED: &[FormatSupport] = &[FormatSupport::new("text/csv", &[UNAP])];

/// CSV 完好性刮取器
pub struct CsvScraper {
    state: ScrapeState,
}

impl CsvScraper {
    /// 创建实例 (工厂函数)
    pub fn create(task: FileTask) -> Box<dyn Scraper> {
        Box::new(Self {
            state: ScrapeState::new(task),
        })
    }
}

impl Scraper for CsvScraper {
    fn name(&self) -> &'static str {
        "CsvScraper"
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

        let delimiter = self
            .state
            .task
            .params
            .delimiter
            .as_deref()
            .and_then(|d| d.chars().next())
            .unwrap_or(',');

        let text = String::from_utf8_lossy(&data);
        let mut first_line = None;
        match parse_records(&text, delimiter) {
            Err(err) => self.state.error(format!("CSV 结构错误: {err}")),
            Ok(records) => {
                let head_fields = records.first().map_or(0, Vec::len);
                for (line, record) in records.iter().enumerate().skip(1) {
                    if record.len() != head_fields {
                        self.state.error(format!(
                            "第 {} 行有 {} 个字段, 首行为 {} 个",
                            line + 1,
                            record.len(),
                            head_fields
                        ));
                    }
                }
                if self.state.errors.is_empty() {
                    self.state
                        .message(format!("CSV 结构完好, 每行 {head_fields} 个字段"));
                }
                first_line = records
                    .first()
                    .map(|head| head.join(&delimiter.to_string()));
            }
        }

        let mimetype = self
            .state
            .task
            .mimetype
            .clone()
            .unwrap_or_else(|| "text/csv".to_owned());
        let mut stream = StreamMetadata::new(0, mimetype, UNAP, Some(StreamType::Text));
        stream.set_attr("delimiter", delimiter.to_string());
        if let Some(first_line) = first_line {
            stream.set_attr("first_line", first_line);
        }
        self.state.streams.push(stream);

        self.state
            .check_supported(SUPPORTED, SupportTolerance::LOOSE_VERSION);
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }
}

/// 解析全部记录; 引号未闭合返回错误
fn parse_records(data: &str, delimiter: char) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = data.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // "" 是引号内的转义引号
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }

    if in_quotes {
        return Err("引号未闭合".to_owned());
    }
    // 末行可以不带换行符
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

/// 注册条目
pub fn entry() -> ScraperEntry {
    ScraperEntry {
        name: "CsvScraper",
        only_wellformed: true,
        supported: SUPPORTED,
        extra_filter: None,
        factory: CsvScraper::create as ScraperFactory,
    }
}
