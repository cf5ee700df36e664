//! 按 (mimetype, version) 查表的通用评级器.

use jian_core::UNAP;

use crate::grade::Grade;

/// 评级表条目: MIME 类型 + 各版本的评级
type Entry = (&'static str, &'static [(&'static str, Grade)]);

const R: Grade = Grade::Recommended;
const A: Grade = Grade::Acceptable;

/// 通用评级表
///
/// 来源为数字保存机构发布的文件格式要求, 逐版本列举.
const FORMATS: &[Entry] = &[
    (
        "application/epub+zip",
        &[("2.0.1", R), ("3.0.0", R), ("3.0.1", R), ("3.2", R)],
    ),
    (
        "application/vnd.oasis.opendocument.text",
        &[("1.0", R), ("1.1", R), ("1.2", R), ("1.3", R)],
    ),
    (
        "application/vnd.oasis.opendocument.spreadsheet",
        &[("1.0", R), ("1.1", R), ("1.2", R), ("1.3", R)],
    ),
    (
        "application/vnd.oasis.opendocument.presentation",
        &[("1.0", R), ("1.1", R), ("1.2", R), ("1.3", R)],
    ),
    (
        "application/vnd.oasis.opendocument.graphics",
        &[("1.0", R), ("1.1", R), ("1.2", R), ("1.3", R)],
    ),
    (
        "application/vnd.oasis.opendocument.formula",
        &[("1.0", R), ("1.2", R), ("1.3", R)],
    ),
    (
        "application/pdf",
        &[
            ("A-1a", R),
            ("A-1b", R),
            ("A-2a", R),
            ("A-2b", R),
            ("A-2u", R),
            ("A-3a", R),
            ("A-3b", R),
            ("A-3u", R),
            ("1.2", A),
            ("1.3", A),
            ("1.4", A),
            ("1.5", A),
            ("1.6", A),
            ("1.7", A),
        ],
    ),
    ("audio/x-aiff", &[(UNAP, A), ("1.3", R)]),
    ("audio/x-wav", &[(UNAP, R), ("2", R)]),
    ("audio/flac", &[("1.2.1", R)]),
    ("audio/L8", &[(UNAP, R)]),
    ("audio/L16", &[(UNAP, R)]),
    ("audio/L20", &[(UNAP, R)]),
    ("audio/L24", &[(UNAP, R)]),
    ("audio/mp4", &[(UNAP, R)]),
    ("image/x-dpx", &[("2.0", R)]),
    ("video/x-ffv", &[("3", R)]),
    ("video/jpeg2000", &[(UNAP, R)]),
    ("video/mp4", &[(UNAP, R)]),
    (
        "image/tiff",
        &[("1.3", R), ("1.4", R), ("1.5", R), ("6.0", R), ("1.0", R)],
    ),
    (
        "image/jpeg",
        &[
            ("1.00", R),
            ("1.01", R),
            ("1.02", R),
            ("2.0", R),
            ("2.1", R),
            ("2.2", R),
            ("2.2.1", R),
            ("2.3", R),
            ("2.3.1", R),
            ("2.3.2", R),
        ],
    ),
    ("image/jp2", &[(UNAP, R)]),
    ("image/svg+xml", &[("1.1", R)]),
    ("image/png", &[("1.2", R)]),
    ("application/warc", &[("1.0", R)]),
    ("application/x-siard", &[("2.0", R), ("2.1", R)]),
    ("application/x-spss-por", &[(UNAP, R)]),
    ("application/matlab", &[("7", R), ("7.3", R)]),
    ("application/x-hdf5", &[("1.1", R)]),
    ("application/msword", &[("97-2003", A)]),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        &[("2007 onwards", A)],
    ),
    ("application/vnd.ms-excel", &[("8", A), ("8X", A)]),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        &[("2007 onwards", A)],
    ),
    ("application/vnd.ms-powerpoint", &[("97-2003", A)]),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        &[("2007 onwards", A)],
    ),
    ("audio/mpeg", &[("1", A), ("2", A)]),
    ("audio/x-ms-wma", &[("9", A)]),
    ("video/dv", &[(UNAP, A)]),
    ("video/mpeg", &[("1", A), ("2", A)]),
    ("video/x-ms-wmv", &[("9", A)]),
    ("application/postscript", &[("3.0", A)]),
    ("image/gif", &[("1987a", A), ("1989a", A)]),
    ("video/avi", &[(UNAP, R)]),
    ("video/x-matroska", &[("4", R)]),
    ("video/MP2T", &[(UNAP, R)]),
    ("application/mxf", &[(UNAP, R)]),
    ("video/mj2", &[(UNAP, R)]),
    ("video/quicktime", &[(UNAP, R)]),
    ("video/x-ms-asf", &[(UNAP, A)]),
    ("video/MP1S", &[(UNAP, A)]),
    ("video/MP2P", &[(UNAP, A)]),
];

/// 本评级器是否认识该 MIME 类型
pub fn is_supported(mimetype: &str) -> bool {
    FORMATS.iter().any(|(mime, _)| *mime == mimetype)
}

/// 按 (mimetype, version) 评级; 版本不在表中即不可接受
pub fn grade(mimetype: &str, version: &str) -> Grade {
    FORMATS
        .iter()
        .find(|(mime, _)| *mime == mimetype)
        .and_then(|(_, versions)| {
            versions
                .iter()
                .find(|(v, _)| *v == version)
                .map(|(_, grade)| *grade)
        })
        .unwrap_or(Grade::Unacceptable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_逐版本评级() {
        assert_eq!(grade("application/pdf", "A-1a"), Grade::Recommended);
        assert_eq!(grade("application/pdf", "1.4"), Grade::Acceptable);
        assert_eq!(grade("application/pdf", "0.9"), Grade::Unacceptable);
        assert_eq!(grade("audio/x-wav", UNAP), Grade::Recommended);
        assert_eq!(grade("application/x-unknown", "1"), Grade::Unacceptable);
    }
}
