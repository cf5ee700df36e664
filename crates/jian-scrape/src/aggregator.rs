//! 刮取结果聚合器.
//!
//! 面向调用方的单文件门面: 组织存在性预检查、格式检测、
//! 刮取器调度与结果合并, 产出统一的流元数据列表、各刮取器
//! 的消息/错误记录和最终完好性判定.
//!
//! 单个刮取器的崩溃或失败只体现为它自己的错误记录, 绝不
//! 中断整条流水线.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use jian_core::{Algorithm, JianResult, StreamType, UNAV, WellFormedness, checksum, is_unav};
use jian_detect::DetectorChain;
use log::{debug, info};

use crate::metadata::StreamMetadata;
use crate::registry::ScraperRegistry;
use crate::scraper::Scraper;
use crate::scrapers::dummy::{FileExists, MimeMatchScraper};
use crate::task::{FileTask, ScrapeParams};

/// 共享的默认注册表 (条目只含静态数据, 进程级共享)
static DEFAULT_REGISTRY: LazyLock<Arc<ScraperRegistry>> =
    LazyLock::new(|| Arc::new(ScraperRegistry::default()));

/// 单个刮取器的执行记录
#[derive(Debug, Clone)]
pub struct ScraperInfo {
    /// 刮取器名称
    pub name: &'static str,
    /// 该刮取器产出的消息
    pub messages: Vec<String>,
    /// 该刮取器产出的错误
    pub errors: Vec<String>,
}

/// 单文件刮取聚合器
///
/// 每个文件创建一个实例. `scrape()` 与 `detect_filetype()`
/// 都从干净状态开始, 重复调用会重置之前的结果.
pub struct FileScraper {
    /// 文件路径
    path: Option<PathBuf>,
    /// 调用方预定义的 MIME 类型
    predefined_mimetype: Option<String>,
    /// 调用方预定义的格式版本
    predefined_version: Option<String>,
    /// 配置选项
    params: ScrapeParams,
    /// 刮取器注册表
    registry: Arc<ScraperRegistry>,
    /// 检测器链
    chain: DetectorChain,
    /// 合并后的流元数据 (按流索引排序)
    streams: Vec<StreamMetadata>,
    /// 各刮取器执行记录
    info: Vec<ScraperInfo>,
    /// 合并后的完好性判定
    well_formed: WellFormedness,
    /// 完整刮取是否已执行过 (文件存在且刮取器已运行)
    scraped: bool,
}

impl FileScraper {
    /// 创建聚合器 (无预定格式, 默认注册表)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            predefined_mimetype: None,
            predefined_version: None,
            params: ScrapeParams::default(),
            registry: Arc::clone(&DEFAULT_REGISTRY),
            chain: DetectorChain::with_default_detectors(),
            streams: Vec::new(),
            info: Vec::new(),
            well_formed: WellFormedness::Undetermined,
            scraped: false,
        }
    }

    /// 设置预定义 MIME 类型
    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.predefined_mimetype = Some(mimetype.into());
        self
    }

    /// 设置预定义格式版本
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.predefined_version = Some(version.into());
        self
    }

    /// 设置配置选项
    pub fn with_params(mut self, params: ScrapeParams) -> Self {
        self.params = params;
        self
    }

    /// 替换刮取器注册表
    pub fn with_registry(mut self, registry: Arc<ScraperRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// 清空之前的结果
    fn reset(&mut self) {
        self.streams.clear();
        self.info.clear();
        self.well_formed = WellFormedness::Undetermined;
        self.scraped = false;
    }

    /// 以当前预定值构造刮取任务
    fn base_task(&self, check_wellformed: bool) -> FileTask {
        FileTask {
            path: self.path.clone(),
            mimetype: self.predefined_mimetype.clone(),
            version: self.predefined_version.clone(),
            check_wellformed,
            params: self.params.clone(),
        }
    }

    /// 仅识别文件格式, 不运行任何刮取器.
    ///
    /// 返回 (mimetype, version); 无法识别时为 `(:unav)`.
    /// 调用方预定义值优先于检测结果.
    pub fn detect_filetype(&mut self) -> (String, String) {
        self.reset();
        self.run_file_exists(false);

        let detection = self.chain.detect_with_predefined(
            self.path.as_deref(),
            self.predefined_mimetype.as_deref(),
            self.predefined_version.as_deref(),
        );
        debug!(
            "格式检测结论: {} {}",
            detection.mimetype, detection.version
        );
        (detection.mimetype, detection.version)
    }

    /// 执行完整的刮取流水线.
    ///
    /// `check_wellformed` 为 false 时只做识别与元数据刮取,
    /// 不产出完好性判定.
    pub fn scrape(&mut self, check_wellformed: bool) {
        self.reset();

        // 存在性预检查: 文件缺失时后续刮取没有意义
        if !self.run_file_exists(check_wellformed) {
            return;
        }

        let detection = self.chain.detect_with_predefined(
            self.path.as_deref(),
            self.predefined_mimetype.as_deref(),
            self.predefined_version.as_deref(),
        );

        // 注册表句柄先克隆出来, 条目借用不能压住 self
        let registry = Arc::clone(&self.registry);
        let entries = registry.scrapers_for(
            &detection.mimetype,
            &detection.version,
            check_wellformed,
            &self.params,
        );

        for entry in entries {
            let mut task = self.base_task(check_wellformed);
            // 刮取器拿到的预定值是检测结论, 不是调用方原始输入
            if !is_unav(&detection.mimetype) {
                task.mimetype = Some(detection.mimetype.clone());
            }
            if !is_unav(&detection.version) {
                task.version = Some(detection.version.clone());
            }

            let mut scraper = (entry.factory)(task);
            info!("运行刮取器 {}", scraper.name());
            scraper.scrape();
            self.collect(scraper.as_ref());
        }

        // 预定义格式与刮取结论的交叉核对
        if self.predefined_mimetype.is_some() || self.predefined_version.is_some() {
            let (resulted_mimetype, resulted_version) = self.conclusion();
            let mut matcher = MimeMatchScraper::new(
                self.base_task(check_wellformed),
                resulted_mimetype,
                resulted_version,
            );
            matcher.scrape();
            self.collect_verdict_only(&matcher);
        }

        self.scraped = true;
    }

    /// 运行存在性预检查; 文件存在返回 true
    fn run_file_exists(&mut self, check_wellformed: bool) -> bool {
        let mut scraper = FileExists::new(self.base_task(check_wellformed));
        scraper.scrape();
        let exists = scraper.errors().is_empty();
        self.collect_verdict_only(&scraper);
        exists
    }

    /// 收集一个刮取器的全部产出: 执行记录、流元数据、判定
    fn collect(&mut self, scraper: &dyn Scraper) {
        let mut merge_errors = Vec::new();
        for stream in scraper.streams() {
            match self.streams.iter_mut().find(|s| s.index == stream.index) {
                Some(existing) => existing.merge_from(stream, &mut merge_errors),
                None => self.streams.push(stream.clone()),
            }
        }
        self.streams.sort_by_key(|s| s.index);

        self.info.push(ScraperInfo {
            name: scraper.name(),
            messages: scraper.messages().to_vec(),
            errors: scraper
                .errors()
                .iter()
                .cloned()
                .chain(merge_errors.iter().cloned())
                .collect(),
        });
        if !merge_errors.is_empty() {
            self.well_formed = self.well_formed.combine(WellFormedness::NotWellFormed);
        }
        self.well_formed = self.well_formed.combine(scraper.well_formed());
    }

    /// 收集执行记录与判定, 不合并流 (预检查类刮取器不产出真实流)
    fn collect_verdict_only(&mut self, scraper: &dyn Scraper) {
        self.info.push(ScraperInfo {
            name: scraper.name(),
            messages: scraper.messages().to_vec(),
            errors: scraper.errors().to_vec(),
        });
        self.well_formed = self.well_formed.combine(scraper.well_formed());
    }

    /// 合并后的刮取结论 (流 0 的 mimetype/version)
    fn conclusion(&self) -> (String, String) {
        match self.streams.first() {
            Some(stream) => (stream.mimetype.clone(), stream.version.clone()),
            None => (UNAV.to_owned(), UNAV.to_owned()),
        }
    }

    /// 文件路径
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// 刮取结论的 MIME 类型; 未刮取或未识别时为 `(:unav)`
    pub fn mimetype(&self) -> String {
        self.conclusion().0
    }

    /// 刮取结论的格式版本; 未刮取或未识别时为 `(:unav)`
    pub fn version(&self) -> String {
        self.conclusion().1
    }

    /// 合并后的流元数据
    pub fn streams(&self) -> &[StreamMetadata] {
        &self.streams
    }

    /// 各刮取器的执行记录
    pub fn info(&self) -> &[ScraperInfo] {
        &self.info
    }

    /// 全部错误 (跨刮取器)
    pub fn errors(&self) -> Vec<&str> {
        self.info
            .iter()
            .flat_map(|i| i.errors.iter().map(String::as_str))
            .collect()
    }

    /// 合并后的完好性判定
    pub fn well_formed(&self) -> WellFormedness {
        self.well_formed
    }

    /// 完整刮取是否已执行 (文件存在且刮取器已运行)
    pub fn scraped(&self) -> bool {
        self.scraped
    }

    /// 刮取结论是否为文本文件
    pub fn is_textfile(&self) -> bool {
        self.streams
            .first()
            .is_some_and(|s| s.stream_type == Some(StreamType::Text))
    }

    /// 计算文件校验和
    pub fn checksum(&self, algorithm: Algorithm) -> JianResult<String> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| jian_core::JianError::InvalidArgument("未给出文件名".to_owned()))?;
        checksum(path, algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    #[test]
    fn test_文本文件_完整流水线() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "notes.txt", "你好, preservation\n".as_bytes());

        let mut scraper = FileScraper::new(&path);
        scraper.scrape(true);

        assert!(scraper.scraped());
        assert_eq!(scraper.well_formed(), WellFormedness::WellFormed);
        assert_eq!(scraper.mimetype(), "text/plain");
        assert!(scraper.is_textfile());
        assert_eq!(scraper.streams()[0].attr("charset"), Some("UTF-8"));
        // 每个刮取器都留下执行记录
        assert!(scraper.info().iter().any(|i| i.name == "FileExists"));
        assert!(scraper.info().iter().any(|i| i.name == "TextfileScraper"));
    }

    #[test]
    fn test_文件缺失_不计为已刮取() {
        let mut scraper = FileScraper::new("no_such_file_at_all.txt");
        scraper.scrape(true);

        assert!(!scraper.scraped());
        assert_eq!(scraper.well_formed(), WellFormedness::NotWellFormed);
        assert!(scraper.streams().is_empty());
        assert!(!scraper.errors().is_empty());
    }

    #[test]
    fn test_预定义格式不一致_强制不完好() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "fake.mpg", b"%PDF-1.4\nnot really video\n%%EOF\n");

        let mut scraper = FileScraper::new(&path).with_mimetype("video/mpeg");
        scraper.scrape(false);

        assert_eq!(scraper.well_formed(), WellFormedness::NotWellFormed);
        assert!(
            scraper
                .info()
                .iter()
                .any(|i| i.name == "MimeMatchScraper" && !i.errors.is_empty())
        );
    }

    #[test]
    fn test_仅识别模式_不做完好性判定() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "img.png", b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0DIHDR");

        let mut scraper = FileScraper::new(&path);
        scraper.scrape(false);

        assert!(scraper.scraped());
        assert_eq!(scraper.well_formed(), WellFormedness::Undetermined);
        assert_eq!(scraper.mimetype(), "image/png");
        assert_eq!(scraper.version(), "1.2");
    }

    #[test]
    fn test_重复刮取从干净状态开始() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", b"hello\n");

        let mut scraper = FileScraper::new(&path);
        scraper.scrape(true);
        let first_info = scraper.info().len();
        scraper.scrape(true);
        assert_eq!(scraper.info().len(), first_info);
        assert_eq!(scraper.streams().len(), 1);
    }

    #[test]
    fn test_多刮取器调度_收集全部产出() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "m.xml", b"<?xml version=\"1.0\"?><r><a/></r>");

        let registry = Arc::new(ScraperRegistry::default());
        let mut scraper = FileScraper::new(&path).with_registry(Arc::clone(&registry));
        scraper.scrape(true);

        // XML 走完好性 + 文本 + 签名三个刮取器, 每个都留下记录
        assert!(scraper.info().iter().any(|i| i.name == "XmlScraper"));
        assert!(scraper.info().iter().any(|i| i.name == "TextfileScraper"));
        assert!(scraper.info().iter().any(|i| i.name == "MagicScraper"));
        assert_eq!(scraper.well_formed(), WellFormedness::WellFormed);
    }

    #[test]
    fn test_仅识别_detect_filetype() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "doc.pdf", b"%PDF-1.6\n");

        let mut scraper = FileScraper::new(&path);
        let (mimetype, version) = scraper.detect_filetype();
        assert_eq!(mimetype, "application/pdf");
        assert_eq!(version, "1.6");
        // 识别不算完整刮取
        assert!(!scraper.scraped());
    }
}
