//! 文本格式评级器.
//!
//! 在 (mimetype, version) 查表之上附加字符集约束:
//! 任一流使用允许列表之外的字符集, 整个文件降为不可接受.

use jian_core::UNAP;
use jian_scrape::StreamMetadata;

use crate::grade::Grade;

type Entry = (&'static str, &'static [(&'static str, Grade)]);

const R: Grade = Grade::Recommended;

/// 文本格式评级表
const FORMATS: &[Entry] = &[
    ("text/csv", &[(UNAP, R)]),
    (
        "application/xhtml+xml",
        &[("1.0", R), ("1.1", R), ("5.0", R)],
    ),
    ("text/xml", &[("1.0", R), ("1.1", R)]),
    (
        "text/html",
        &[("4.01", R), ("5.0", R), ("5.1", R), ("5.2", R)],
    ),
    ("text/plain", &[(UNAP, R)]),
    ("application/gml+xml", &[("3.2.1", R)]),
    ("application/vnd.google-earth.kml+xml", &[("2.3", R)]),
];

/// 保存用途允许的字符集
const ALLOWED_CHARSETS: &[&str] = &["ISO-8859-15", "UTF-8", "UTF-16", "UTF-32"];

/// 本评级器是否认识该 MIME 类型
pub fn is_supported(mimetype: &str) -> bool {
    FORMATS.iter().any(|(mime, _)| *mime == mimetype)
}

/// 评级; 表外版本或不允许的字符集均为不可接受
pub fn grade(mimetype: &str, version: &str, streams: &[StreamMetadata]) -> Grade {
    let mut grade = FORMATS
        .iter()
        .find(|(mime, _)| *mime == mimetype)
        .and_then(|(_, versions)| {
            versions
                .iter()
                .find(|(v, _)| *v == version)
                .map(|(_, grade)| *grade)
        })
        .unwrap_or(Grade::Unacceptable);

    for stream in streams {
        // 字符集标签不区分大小写
        let allowed = stream.attr("charset").is_some_and(|charset| {
            ALLOWED_CHARSETS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(charset))
        });
        if !allowed {
            grade = Grade::Unacceptable;
        }
    }

    grade
}

#[cfg(test)]
mod tests {
    use super::*;
    use jian_core::StreamType;

    fn text_stream(charset: Option<&str>) -> StreamMetadata {
        let mut stream =
            StreamMetadata::new(0, "text/plain", UNAP, Some(StreamType::Text));
        if let Some(charset) = charset {
            stream.set_attr("charset", charset);
        }
        stream
    }

    #[test]
    fn test_允许的字符集() {
        let streams = [text_stream(Some("UTF-8"))];
        assert_eq!(grade("text/plain", UNAP, &streams), Grade::Recommended);
    }

    #[test]
    fn test_字符集比较不区分大小写() {
        let streams = [text_stream(Some("utf-8"))];
        assert_eq!(grade("text/plain", UNAP, &streams), Grade::Recommended);
    }

    #[test]
    fn test_不允许的字符集降级() {
        let streams = [text_stream(Some("EBCDIC"))];
        assert_eq!(grade("text/plain", UNAP, &streams), Grade::Unacceptable);
    }

    #[test]
    fn test_字符集缺失降级() {
        let streams = [text_stream(None)];
        assert_eq!(grade("text/plain", UNAP, &streams), Grade::Unacceptable);
    }

    #[test]
    fn test_表外版本不可接受() {
        let mut stream = text_stream(Some("UTF-8"));
        stream.mimetype = "text/xml".to_owned();
        stream.version = "2.0".to_owned();
        assert_eq!(grade("text/xml", "2.0", &[stream]), Grade::Unacceptable);
    }
}
