//! 哨兵刮取器.
//!
//! 不调用外部工具的特殊刮取器: "未找到刮取器"、文件存在性
//! 预检查、预定格式与刮取结论的交叉核对.

use jian_core::{WellFormedness, is_unav};

use crate::registry::{ScraperEntry, ScraperFactory};
use crate::scraper::{ScrapeState, Scraper};
use crate::task::FileTask;

/// 未找到合适刮取器时的哨兵刮取器
///
/// 完好性恒为不完好: 严格地说完好性未知, 但无法归类的文件
/// 永远不是期望的输出, 绝不能被评为 "可能有效".
pub struct ScraperNotFound {
    state: ScrapeState,
}

impl ScraperNotFound {
    /// 创建实例 (工厂函数)
    pub fn create(task: FileTask) -> Box<dyn Scraper> {
        Box::new(Self {
            state: ScrapeState::new(task),
        })
    }
}

impl Scraper for ScraperNotFound {
    fn name(&self) -> &'static str {
        "ScraperNotFound"
    }

    fn scrape(&mut self) {
        self.state
            .error("未找到合适的刮取器, 文件未被分析".to_owned());
        self.state.ensure_stream();
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }

    fn well_formed(&self) -> WellFormedness {
        WellFormedness::NotWellFormed
    }
}

/// 哨兵条目 (仅由注册表在无匹配时产出, 不参与正常匹配)
pub fn not_found_entry() -> ScraperEntry {
    ScraperEntry {
        name: "ScraperNotFound",
        only_wellformed: false,
        supported: &[],
        extra_filter: None,
        factory: ScraperNotFound::create as ScraperFactory,
    }
}

/// 文件存在性预检查刮取器
///
/// 在一切刮取之前运行: 路径缺失或文件不存在记录为错误并使
/// 完好性为不完好; 文件存在时不对完好性做任何判定.
pub struct FileExists {
    state: ScrapeState,
}

impl FileExists {
    /// 创建实例
    pub fn new(task: FileTask) -> Self {
        Self {
            state: ScrapeState::new(task),
        }
    }
}

impl Scraper for FileExists {
    fn name(&self) -> &'static str {
        "FileExists"
    }

    fn scrape(&mut self) {
        match self.state.task.path.clone() {
            None => self.state.error("未给出文件名".to_owned()),
            Some(path) if path.is_file() => {
                self.state
                    .message(format!("文件 {} 存在", path.display()));
            }
            Some(path) => {
                self.state
                    .error(format!("文件 {} 不存在", path.display()));
            }
        }
        self.state.ensure_stream();
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }

    fn well_formed(&self) -> WellFormedness {
        // 存在性检查本身不能证明文件完好
        if self.state.errors.is_empty() {
            WellFormedness::Undetermined
        } else {
            WellFormedness::NotWellFormed
        }
    }
}

/// 预定格式交叉核对刮取器
///
/// 对比调用方预定义的 mimetype/version 与刮取得到的最终值:
/// 不一致记录为错误: 文件内部自洽但不是调用方声称的格式,
/// 同样是不完好.
pub struct MimeMatchScraper {
    state: ScrapeState,
    /// 刮取得到的最终 mimetype
    resulted_mimetype: String,
    /// 刮取得到的最终版本
    resulted_version: String,
}

impl MimeMatchScraper {
    /// 创建实例; `resulted_*` 为聚合后的刮取结论
    pub fn new(task: FileTask, resulted_mimetype: String, resulted_version: String) -> Self {
        Self {
            state: ScrapeState::new(task),
            resulted_mimetype,
            resulted_version,
        }
    }
}

impl Scraper for MimeMatchScraper {
    fn name(&self) -> &'static str {
        "MimeMatchScraper"
    }

    fn scrape(&mut self) {
        self.state
            .message("MIME 类型与格式版本核对".to_owned());

        let predefined_mime = self.state.task.mimetype.clone();
        let predefined_version = self.state.task.version.clone();

        if is_unav(&self.resulted_mimetype) {
            self.state.error("文件格式不受支持".to_owned());
        } else if let Some(mime) = &predefined_mime {
            if !mime.eq_ignore_ascii_case(&self.resulted_mimetype) {
                self.state.error(format!(
                    "预定义 MIME 类型 {mime} 与刮取结论 {} 不一致",
                    self.resulted_mimetype
                ));
            }
        }

        if let Some(version) = &predefined_version {
            if version != &self.resulted_version {
                self.state.error(format!(
                    "预定义版本 {version} 与刮取结论 {} 不一致",
                    self.resulted_version
                ));
            }
        }

        self.state.ensure_stream();
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }

    fn well_formed(&self) -> WellFormedness {
        // 核对结果与校验模式无关: 不一致必须压制所有其他判定
        if self.state.errors.is_empty() {
            WellFormedness::Undetermined
        } else {
            WellFormedness::NotWellFormed
        }
    }
}
