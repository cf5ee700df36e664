//! 签名元数据刮取器.
//!
//! 扮演 "格式库" 角色的通用元数据刮取器: 复用检测器的魔数
//! 签名分析, 为大量常见格式产出 mimetype/version/流类型.
//! 支持完整检查与仅识别两种模式, 作为注册表中的兜底刮取器
//! 排在最末.

use jian_detect::{Detector, ExtensionDetector, SignatureDetector};

use crate::metadata::{FormatSupport, StreamMetadata, stream_type_for_mimetype};
use crate::registry::{ScraperEntry, ScraperFactory};
use crate::scraper::{ScrapeState, Scraper, SupportTolerance};
use crate::task::FileTask;

/// 支持的格式范围
const SUPPORTED: &[FormatSupport] = &[
    FormatSupport::new(
        "application/pdf",
        &[
            "1.2", "1.3", "1.4", "1.5", "1.6", "1.7", "A-1a", "A-1b", "A-2a", "A-2b", "A-2u",
            "A-3a", "A-3b", "A-3u",
        ],
    ),
    FormatSupport::new("image/png", &["1.2"]),
    FormatSupport::new("image/gif", &["1987a", "1989a"]),
    FormatSupport::any_version("image/jpeg"),
    FormatSupport::new("image/tiff", &["6.0"]),
    FormatSupport::new("text/xml", &["1.0", "1.1"]),
    FormatSupport::new("text/html", &["4.01", "5.0", "5.1", "5.2"]),
    FormatSupport::new("application/xhtml+xml", &["1.0", "1.1", "5.0"]),
    FormatSupport::any_version("text/plain"),
    FormatSupport::any_version("text/csv"),
    FormatSupport::any_version("application/gzip"),
    FormatSupport::any_version("application/zip"),
    FormatSupport::any_version("application/warc"),
    FormatSupport::any_version("application/x-spss-por"),
    FormatSupport::any_version("audio/x-wav"),
    FormatSupport::any_version("audio/flac"),
    FormatSupport::any_version("audio/mpeg"),
    FormatSupport::any_version("audio/mp4"),
    FormatSupport::any_version("video/mp4"),
    FormatSupport::any_version("video/mpeg"),
    FormatSupport::any_version("video/quicktime"),
    FormatSupport::any_version("video/x-matroska"),
    FormatSupport::any_version("video/MP1S"),
    FormatSupport::any_version("video/MP2P"),
    FormatSupport::any_version("video/MP2T"),
    FormatSupport::any_version("application/postscript"),
];

/// 签名元数据刮取器
pub struct MagicScraper {
    state: ScrapeState,
}

impl MagicScraper {
    /// 创建实例 (工厂函数)
    pub fn create(task: FileTask) -> Box<dyn Scraper> {
        Box::new(Self {
            state: ScrapeState::new(task),
        })
    }
}

impl Scraper for MagicScraper {
    fn name(&self) -> &'static str {
        "MagicScraper"
    }

    fn scrape(&mut self) {
        let header = match read_header(&self.state) {
            Ok(header) => header,
            Err(msg) => {
                self.state.error(msg);
                self.state.ensure_stream();
                return;
            }
        };

        let filename = self
            .state
            .task
            .path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(str::to_owned);

        // 签名优先, 扩展名兜底 (与检测链同序)
        let mut detection = SignatureDetector.detect(&header, filename.as_deref());
        if !detection.found() {
            detection = ExtensionDetector.detect(&header, filename.as_deref());
        }

        if !detection.found() {
            self.state.error("无法从文件内容识别格式".to_owned());
            self.state.ensure_stream();
            return;
        }

        // 预定版本比签名读出的版本更可信 (可能来自更专业的检测)
        let version = match &self.state.task.version {
            Some(v) => v.clone(),
            None => detection.version.clone(),
        };

        let stream_type = stream_type_for_mimetype(&detection.mimetype);
        let stream = StreamMetadata::new(0, detection.mimetype, version, stream_type);
        self.state.streams.push(stream);
        self.state.message("文件签名分析完成".to_owned());

        self.state
            .check_supported(SUPPORTED, SupportTolerance::LOOSE_VERSION);
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }
}

/// 读取文件头部 (最多 8KB)
fn read_header(state: &ScrapeState) -> Result<Vec<u8>, String> {
    use std::io::Read;

    let Some(path) = state.task.path() else {
        return Err("未给出文件名".to_owned());
    };
    let mut header = vec![0u8; 8192];
    let mut file =
        std::fs::File::open(path).map_err(|e| format!("打开文件失败: {e}"))?;
    let n = file
        .read(&mut header)
        .map_err(|e| format!("读取文件失败: {e}"))?;
    header.truncate(n);
    Ok(header)
}

/// 注册条目
pub fn entry() -> ScraperEntry {
    ScraperEntry {
        name: "MagicScraper",
        only_wellformed: false,
        supported: SUPPORTED,
        extra_filter: None,
        factory: MagicScraper::create as ScraperFactory,
    }
}
