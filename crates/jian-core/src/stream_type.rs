//! 流类型定义.
//!
//! 一个文件可包含多条逻辑流: 容器包装、音轨、视频轨、页面等.

use std::fmt;

/// 流类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamType {
    /// 二进制流
    Binary,
    /// 文本流
    Text,
    /// 图像流
    Image,
    /// 音频流
    Audio,
    /// 视频流
    Video,
    /// 音视频容器
    VideoContainer,
}

impl StreamType {
    /// 获取流类型的标识名称 (用于输出)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::VideoContainer => "videocontainer",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
