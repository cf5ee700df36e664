//! # jian-grade
//!
//! Jian 文件格式鉴定框架的数字保存评级层.
//!
//! 评级以刮取结论为输入: 容器格式按装载内容评级, 文本格式
//! 附加字符集约束, 其余格式按 (mimetype, version) 查表.
//! 评级与完好性正交, 回答的是 "该不该收" 而不是 "坏没坏".

pub mod container;
pub mod grade;
pub mod mime;
pub mod text;

use jian_scrape::{FileScraper, StreamMetadata};
use log::debug;

pub use grade::Grade;

/// 对刮取结论评级.
///
/// 评级器选择顺序固定: 容器评级器优先于文本评级器, 文本
/// 评级器优先于通用查表; 没有评级器认识该格式即不可接受.
pub fn grade_streams(streams: &[StreamMetadata]) -> Grade {
    let Some(first) = streams.first() else {
        return Grade::Unacceptable;
    };
    let mimetype = first.mimetype.as_str();
    let version = first.version.as_str();

    let grade = if container::is_supported(mimetype) {
        container::grade(streams)
    } else if text::is_supported(mimetype) {
        text::grade(mimetype, version, streams)
    } else if mime::is_supported(mimetype) {
        mime::grade(mimetype, version)
    } else {
        Grade::Unacceptable
    };
    debug!("评级结论: {mimetype} {version} -> {grade}");
    grade
}

/// 对一次完整刮取的结果评级.
///
/// 刮取尚未执行 (或文件缺失导致刮取未运行) 时评级不可得,
/// 返回 [`Grade::Unav`] 而不是妄下结论.
pub fn grade_scraper(scraper: &FileScraper) -> Grade {
    if !scraper.scraped() {
        return Grade::Unav;
    }
    grade_streams(scraper.streams())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jian_core::{StreamType, UNAP};

    #[test]
    fn test_评级器选择顺序() {
        // video/mp4 同时出现在容器表与通用表, 容器评级器优先
        let streams = vec![
            StreamMetadata::new(0, "video/mp4", UNAP, Some(StreamType::VideoContainer)),
            StreamMetadata::new(1, "video/x-ms-wmv", "9", Some(StreamType::Video)),
        ];
        assert_eq!(grade_streams(&streams), Grade::Unacceptable);

        // 文本格式走文本评级器, 字符集约束生效
        let mut stream = StreamMetadata::new(0, "text/plain", UNAP, Some(StreamType::Text));
        stream.set_attr("charset", "UTF-16");
        assert_eq!(grade_streams(&[stream]), Grade::Recommended);

        // 其余格式查通用表
        let stream = StreamMetadata::new(0, "image/png", "1.2", Some(StreamType::Image));
        assert_eq!(grade_streams(&[stream]), Grade::Recommended);
    }

    #[test]
    fn test_陌生格式不可接受() {
        let stream = StreamMetadata::new(0, "application/x-mystery", "1", None);
        assert_eq!(grade_streams(&[stream]), Grade::Unacceptable);
        assert_eq!(grade_streams(&[]), Grade::Unacceptable);
    }

    #[test]
    fn test_未刮取时评级不可得() {
        let scraper = FileScraper::new("never_scraped.bin");
        assert_eq!(grade_scraper(&scraper), Grade::Unav);
    }
}
