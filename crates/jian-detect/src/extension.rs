//! 扩展名检测器.
//!
//! 检测链的兜底检测器: 仅根据文件扩展名给出猜测,
//! 置信度低于签名检测, 因此排在链的末位.

use jian_core::{UNAP, UNAV};
use log::debug;

use crate::detector::{Detection, Detector};

/// 扩展名 → (mimetype, version) 映射表
///
/// 版本大多留作占位符, 由刮取器补全; 只有无版本概念的格式
/// 直接给出 `(:unap)`.
const EXTENSION_TABLE: &[(&str, &str, &str)] = &[
    ("txt", "text/plain", UNAP),
    ("csv", "text/csv", UNAP),
    ("xml", "text/xml", UNAV),
    ("xhtml", "application/xhtml+xml", UNAV),
    ("html", "text/html", UNAV),
    ("htm", "text/html", UNAV),
    ("pdf", "application/pdf", UNAV),
    ("png", "image/png", "1.2"),
    ("jpg", "image/jpeg", UNAV),
    ("jpeg", "image/jpeg", UNAV),
    ("jp2", "image/jp2", UNAP),
    ("gif", "image/gif", UNAV),
    ("tif", "image/tiff", UNAV),
    ("tiff", "image/tiff", UNAV),
    ("dpx", "image/x-dpx", UNAV),
    ("svg", "image/svg+xml", UNAV),
    ("wav", "audio/x-wav", UNAP),
    ("flac", "audio/flac", UNAV),
    ("aiff", "audio/x-aiff", UNAV),
    ("aif", "audio/x-aiff", UNAV),
    ("mp3", "audio/mpeg", UNAV),
    ("m4a", "audio/mp4", UNAP),
    ("mp4", "video/mp4", UNAP),
    ("mkv", "video/x-matroska", UNAV),
    ("avi", "video/avi", UNAP),
    ("mov", "video/quicktime", UNAP),
    ("mpg", "video/mpeg", UNAV),
    ("mpeg", "video/mpeg", UNAV),
    ("ts", "video/MP2T", UNAP),
    ("mxf", "application/mxf", UNAP),
    ("por", "application/x-spss-por", UNAP),
    ("warc", "application/warc", UNAV),
    ("gz", "application/gzip", UNAV),
    ("zip", "application/zip", UNAV),
    ("eps", "application/postscript", UNAV),
    ("ps", "application/postscript", UNAV),
];

/// 扩展名检测器
pub struct ExtensionDetector;

impl Detector for ExtensionDetector {
    fn name(&self) -> &'static str {
        "ExtensionDetector"
    }

    fn detect(&self, _header: &[u8], filename: Option<&str>) -> Detection {
        let Some(name) = filename else {
            return Detection::unknown();
        };
        let lower = name.to_ascii_lowercase();
        let Some(ext) = lower.rsplit('.').next().filter(|e| *e != lower) else {
            return Detection::unknown();
        };

        for (entry_ext, mimetype, version) in EXTENSION_TABLE {
            if *entry_ext == ext {
                debug!("扩展名检测命中: .{ext} → {mimetype}");
                return Detection::new(*mimetype, *version);
            }
        }
        Detection::unknown()
    }
}
