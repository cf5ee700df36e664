//! 容器格式评级器.
//!
//! 容器的评级取决于它装了什么: 所含全部轨道落在推荐集合内
//! (或容器为空) 即推荐; 落在推荐与可接受并集内即可接受;
//! 出现任何集合之外的轨道即不可接受.

use jian_core::UNAP;
use jian_scrape::StreamMetadata;

use crate::grade::Grade;

/// 容器约束条目: 容器 MIME 类型 + 允许装载的 (mimetype, version) 集合
type Entry = (&'static str, &'static [(&'static str, &'static str)]);

/// 推荐装载集合
///
/// AVI 与 DV 只有不含视频轨时才算推荐, 故推荐集合里只有音频.
const RECOMMENDED: &[Entry] = &[
    (
        "video/avi",
        &[
            ("audio/L16", UNAP),
            ("audio/L8", UNAP),
            ("audio/L20", UNAP),
            ("audio/L24", UNAP),
        ],
    ),
    (
        "video/dv",
        &[
            ("audio/L16", UNAP),
            ("audio/L8", UNAP),
            ("audio/L20", UNAP),
            ("audio/L24", UNAP),
        ],
    ),
    (
        "video/x-matroska",
        &[
            ("audio/L16", UNAP),
            ("audio/L8", UNAP),
            ("audio/L20", UNAP),
            ("audio/L24", UNAP),
            ("audio/flac", "1.2.1"),
            ("video/x-ffv", "3"),
        ],
    ),
    ("video/MP2T", &[("audio/mp4", UNAP), ("video/mp4", UNAP)]),
    ("video/mp4", &[("audio/mp4", UNAP), ("video/mp4", UNAP)]),
    (
        "application/mxf",
        &[
            ("audio/mp4", UNAP),
            ("audio/L16", UNAP),
            ("audio/L8", UNAP),
            ("audio/L20", UNAP),
            ("audio/L24", UNAP),
            ("video/mp4", UNAP),
            ("video/jpeg2000", UNAP),
        ],
    ),
    (
        "video/mj2",
        &[
            ("audio/L16", UNAP),
            ("audio/L8", UNAP),
            ("audio/L20", UNAP),
            ("audio/L24", UNAP),
            ("video/jpeg2000", UNAP),
        ],
    ),
    (
        "video/quicktime",
        &[
            ("audio/mp4", UNAP),
            ("audio/L16", UNAP),
            ("audio/L8", UNAP),
            ("audio/L20", UNAP),
            ("audio/L24", UNAP),
            ("video/mp4", UNAP),
            ("video/jpeg2000", UNAP),
        ],
    ),
];

/// 可接受装载集合
const ACCEPTABLE: &[Entry] = &[
    (
        "video/x-ms-asf",
        &[("audio/x-ms-wma", "9"), ("video/x-ms-wmv", "9")],
    ),
    (
        "video/avi",
        &[
            ("audio/mpeg", "1"),
            ("audio/mpeg", "2"),
            ("video/dv", UNAP),
            ("video/mpeg", "2"),
        ],
    ),
    ("video/dv", &[("video/dv", UNAP)]),
    (
        "video/MP1S",
        &[("audio/mpeg", "1"), ("audio/mpeg", "2"), ("video/mpeg", "2")],
    ),
    (
        "video/MP2P",
        &[("audio/mpeg", "1"), ("audio/mpeg", "2"), ("video/mpeg", "2")],
    ),
    ("video/MP2T", &[("video/mpeg", "2")]),
    (
        "video/mp4",
        &[("audio/mpeg", "1"), ("audio/mpeg", "2"), ("video/mpeg", "2")],
    ),
    (
        "application/mxf",
        &[
            ("audio/mpeg", "1"),
            ("audio/mpeg", "2"),
            ("video/dv", UNAP),
            ("video/mpeg", "2"),
        ],
    ),
    (
        "video/quicktime",
        &[
            ("audio/mpeg", "1"),
            ("audio/mpeg", "2"),
            ("video/dv", UNAP),
            ("video/mpeg", "2"),
        ],
    ),
];

fn lookup(table: &[Entry], mimetype: &str) -> &'static [(&'static str, &'static str)] {
    table
        .iter()
        .find(|(mime, _)| *mime == mimetype)
        .map(|(_, contained)| *contained)
        .unwrap_or(&[])
}

/// 本评级器是否认识该容器 MIME 类型
pub fn is_supported(mimetype: &str) -> bool {
    RECOMMENDED.iter().any(|(mime, _)| *mime == mimetype)
        || ACCEPTABLE.iter().any(|(mime, _)| *mime == mimetype)
}

/// 按容器装载内容评级.
///
/// 流 0 是容器本身, 其余流是装载的轨道; 空容器评为推荐.
pub fn grade(streams: &[StreamMetadata]) -> Grade {
    let Some(container) = streams.first() else {
        return Grade::Unacceptable;
    };

    let recommended = lookup(RECOMMENDED, &container.mimetype);
    let acceptable = lookup(ACCEPTABLE, &container.mimetype);

    let in_table = |table: &[(&str, &str)], stream: &StreamMetadata| {
        table
            .iter()
            .any(|(mime, version)| *mime == stream.mimetype && *version == stream.version)
    };

    let tracks = streams.iter().filter(|s| s.index != 0);
    let mut grade = Grade::Recommended;
    for track in tracks {
        if in_table(recommended, track) {
            continue;
        }
        if in_table(acceptable, track) {
            grade = Grade::Acceptable;
            continue;
        }
        return Grade::Unacceptable;
    }
    grade
}

#[cfg(test)]
mod tests {
    use super::*;
    use jian_core::StreamType;

    fn container(mimetype: &str, tracks: &[(&str, &str)]) -> Vec<StreamMetadata> {
        let mut streams = vec![StreamMetadata::new(
            0,
            mimetype,
            "4",
            Some(StreamType::VideoContainer),
        )];
        for (i, (mime, version)) in tracks.iter().enumerate() {
            streams.push(StreamMetadata::new(i + 1, *mime, *version, None));
        }
        streams
    }

    #[test]
    fn test_空容器评为推荐() {
        let streams = container("video/x-matroska", &[]);
        assert_eq!(grade(&streams), Grade::Recommended);
    }

    #[test]
    fn test_全部推荐轨道() {
        let streams = container(
            "video/x-matroska",
            &[("video/x-ffv", "3"), ("audio/flac", "1.2.1")],
        );
        assert_eq!(grade(&streams), Grade::Recommended);
    }

    #[test]
    fn test_可接受轨道降级() {
        let streams = container(
            "video/mp4",
            &[("video/mpeg", "2"), ("audio/mp4", UNAP)],
        );
        assert_eq!(grade(&streams), Grade::Acceptable);
    }

    #[test]
    fn test_集合外轨道不可接受() {
        let streams = container("video/x-matroska", &[("video/x-ms-wmv", "9")]);
        assert_eq!(grade(&streams), Grade::Unacceptable);
    }
}
