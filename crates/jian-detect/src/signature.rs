//! 内容签名检测器.
//!
//! 通过文件头部的魔数识别格式, 是检测链中优先级最高的检测器.
//! 部分格式的版本可以直接从头部读出 (PDF, GIF, WARC 等),
//! 其余格式的版本留给刮取器补全.

use jian_core::{UNAP, UNAV};
use log::debug;

use crate::detector::{Detection, Detector};

/// 内容签名检测器
pub struct SignatureDetector;

impl Detector for SignatureDetector {
    fn name(&self) -> &'static str {
        "SignatureDetector"
    }

    fn detect(&self, header: &[u8], _filename: Option<&str>) -> Detection {
        let detection = detect_signature(header);
        if detection.found() {
            debug!(
                "签名检测命中: mimetype={} version={}",
                detection.mimetype, detection.version
            );
        }
        detection
    }
}

/// 根据魔数检测格式
fn detect_signature(data: &[u8]) -> Detection {
    // PDF: "%PDF-<版本>"
    if data.starts_with(b"%PDF-") {
        return Detection::new("application/pdf", pdf_header_version(data));
    }

    // PNG 魔数
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Detection::new("image/png", "1.2");
    }

    // GIF: 版本直接编码在签名中
    if data.starts_with(b"GIF87a") {
        return Detection::new("image/gif", "1987a");
    }
    if data.starts_with(b"GIF89a") {
        return Detection::new("image/gif", "1989a");
    }

    // JPEG: SOI 标记, JFIF 版本在 APP0 段中
    if data.starts_with(b"\xFF\xD8\xFF") {
        return Detection::new("image/jpeg", jfif_version(data));
    }

    // TIFF: II (little-endian) 或 MM (big-endian)
    if data.starts_with(b"II\x2A\x00") || data.starts_with(b"MM\x00\x2A") {
        return Detection::new("image/tiff", "6.0");
    }

    // gzip
    if data.starts_with(b"\x1F\x8B") {
        return Detection::new("application/gzip", UNAV);
    }

    // zip (ODF/OOXML 等容器的外壳, 具体格式由刮取器判定)
    if data.starts_with(b"PK\x03\x04") {
        return Detection::new("application/zip", UNAV);
    }

    // WARC: "WARC/<版本>"
    if data.starts_with(b"WARC/") {
        let version: String = data[5..]
            .iter()
            .take_while(|b| b.is_ascii_digit() || **b == b'.')
            .map(|b| *b as char)
            .collect();
        if !version.is_empty() {
            return Detection::new("application/warc", version);
        }
        return Detection::new("application/warc", UNAV);
    }

    // RIFF WAVE
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE" {
        return Detection::new("audio/x-wav", UNAP);
    }

    // FLAC 原生容器
    if data.starts_with(b"fLaC") {
        return Detection::new("audio/flac", UNAV);
    }

    // EBML (Matroska)
    if data.starts_with(b"\x1A\x45\xDF\xA3") {
        return Detection::new("video/x-matroska", UNAV);
    }

    // MP4 家族: offset 4 处的 "ftyp" box
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        let brand = &data[8..12];
        if brand.starts_with(b"qt") {
            return Detection::new("video/quicktime", UNAP);
        }
        if brand.starts_with(b"M4A") {
            return Detection::new("audio/mp4", UNAP);
        }
        return Detection::new("video/mp4", UNAP);
    }

    // MPEG 节目流 (pack header)
    if data.starts_with(b"\x00\x00\x01\xBA") {
        if data.len() > 4 && data[4] & 0xC0 == 0x40 {
            return Detection::new("video/MP2P", UNAP);
        }
        return Detection::new("video/MP1S", UNAP);
    }

    // MPEG 传输流: 同步字节 0x47 以 188 字节为周期出现
    if data.len() >= 189 && data[0] == 0x47 && data[188] == 0x47 {
        return Detection::new("video/MP2T", UNAP);
    }

    // MPEG 视频基本流 (sequence header)
    if data.starts_with(b"\x00\x00\x01\xB3") {
        return Detection::new("video/mpeg", UNAV);
    }

    // MP3: ID3 标签
    if data.starts_with(b"ID3") {
        return Detection::new("audio/mpeg", UNAV);
    }

    // SPSS Portable: 头部固定包含签名行
    if data.len() >= 512 && contains(&data[..512], b"SPSS PORT FILE") {
        return Detection::new("application/x-spss-por", UNAP);
    }

    // XML 声明 (可带 UTF-8 BOM)
    let text = strip_bom(data);
    if text.starts_with(b"<?xml") {
        return Detection::new("text/xml", xml_declaration_version(text));
    }

    // HTML5 doctype
    if starts_with_ignore_case(text, b"<!DOCTYPE html>") {
        return Detection::new("text/html", "5.0");
    }
    if starts_with_ignore_case(text, b"<html") {
        return Detection::new("text/html", UNAV);
    }

    Detection::unknown()
}

/// 从 "%PDF-x.y" 头部读出版本号
///
/// 头部只区分基础版本; PDF/A 档位由刮取器判定.
fn pdf_header_version(data: &[u8]) -> String {
    let version: String = data[5..]
        .iter()
        .take_while(|b| b.is_ascii_digit() || **b == b'.')
        .map(|b| *b as char)
        .collect();
    if version.is_empty() {
        UNAV.to_owned()
    } else {
        version
    }
}

/// 从 JFIF APP0 段读出版本号 (如 "1.01")
fn jfif_version(data: &[u8]) -> String {
    if data.len() >= 13 && &data[6..11] == b"JFIF\x00" {
        return format!("{}.{:02}", data[11], data[12]);
    }
    UNAV.to_owned()
}

/// 从 XML 声明读出版本号
fn xml_declaration_version(data: &[u8]) -> String {
    let head = &data[..data.len().min(256)];
    if let Some(pos) = find(head, b"version=") {
        let rest = &head[pos + 8..];
        if rest.len() >= 2 {
            let quote = rest[0];
            if quote == b'"' || quote == b'\'' {
                let version: String = rest[1..]
                    .iter()
                    .take_while(|b| **b != quote)
                    .map(|b| *b as char)
                    .collect();
                if !version.is_empty() {
                    return version;
                }
            }
        }
    }
    UNAV.to_owned()
}

/// 去掉 UTF-8 BOM
fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(data)
}

/// 子串查找
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// 子串包含判定
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}

/// ASCII 大小写不敏感前缀判定
fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len()
        && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_检测_pdf_头部版本() {
        let d = detect_signature(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3");
        assert_eq!(d.mimetype, "application/pdf");
        assert_eq!(d.version, "1.4");
    }

    #[test]
    fn test_检测_png() {
        let d = detect_signature(b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0DIHDR");
        assert_eq!(d.mimetype, "image/png");
        assert_eq!(d.version, "1.2");
    }

    #[test]
    fn test_检测_gif_版本() {
        assert_eq!(detect_signature(b"GIF87a....").version, "1987a");
        assert_eq!(detect_signature(b"GIF89a....").version, "1989a");
    }

    #[test]
    fn test_检测_wav() {
        let mut data = Vec::new();
        data.extend_from_slice(b"RIFF");
        data.extend_from_slice(&36u32.to_le_bytes());
        data.extend_from_slice(b"WAVE");
        let d = detect_signature(&data);
        assert_eq!(d.mimetype, "audio/x-wav");
        assert_eq!(d.version, UNAP);
    }

    #[test]
    fn test_检测_xml_声明() {
        let d = detect_signature(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>");
        assert_eq!(d.mimetype, "text/xml");
        assert_eq!(d.version, "1.0");
    }

    #[test]
    fn test_检测_未知格式() {
        assert!(!detect_signature(b"hello world").found());
        assert!(!detect_signature(b"").found());
    }

    #[test]
    fn test_检测_mp4_品牌() {
        let mut data = vec![0, 0, 0, 0x18];
        data.extend_from_slice(b"ftypisom\0\0\0\0isomiso2");
        assert_eq!(detect_signature(&data).mimetype, "video/mp4");

        let mut data = vec![0, 0, 0, 0x14];
        data.extend_from_slice(b"ftypqt  \0\0\0\0qt  ");
        assert_eq!(detect_signature(&data).mimetype, "video/quicktime");
    }
}
