//! ffprobe 音视频刮取器.
//!
//! 包装 ffprobe 的 JSON 输出: 解码容器与全部音视频轨,
//! 为每条轨产出一条流元数据. 纯容器格式的流 0 是容器本身,
//! 轨道从流 1 起编号; WAV 作为单轨格式例外, 只产出音频流.

use jian_core::{StreamType, UNAP, UNAV};
use serde::Deserialize;

use crate::metadata::{FormatSupport, StreamMetadata};
use crate::registry::{ScraperEntry, ScraperFactory};
use crate::scraper::{ScrapeState, Scraper, SupportTolerance};
use crate::shell;
use crate::task::FileTask;

/// 支持的格式范围
const SUPPORTED: &[FormatSupport] = &[
    FormatSupport::new("video/mpeg", &["1", "2"]),
    FormatSupport::new("audio/mpeg", &["1", "2"]),
    FormatSupport::new("video/mp4", &[UNAP]),
    FormatSupport::new("audio/mp4", &[UNAP]),
    FormatSupport::new("video/MP1S", &[UNAP]),
    FormatSupport::new("video/MP2P", &[UNAP]),
    FormatSupport::new("video/MP2T", &[UNAP]),
    FormatSupport::new("audio/x-wav", &[UNAP]),
    FormatSupport::new("audio/flac", &["1.2.1"]),
    FormatSupport::new("video/quicktime", &[UNAP]),
    FormatSupport::new("video/x-matroska", &["4"]),
    FormatSupport::new("video/dv", &[UNAP]),
];

/// ffprobe JSON 顶层结构
#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

/// 容器级信息
#[derive(Debug, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    format_name: String,
}

/// 轨道级信息
#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_name: String,
    #[serde(default)]
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    sample_rate: Option<String>,
    channels: Option<u32>,
}

/// ffprobe 刮取器
pub struct FfprobeScraper {
    state: ScrapeState,
}

impl FfprobeScraper {
    /// 创建实例 (工厂函数)
    pub fn create(task: FileTask) -> Box<dyn Scraper> {
        Box::new(Self {
            state: ScrapeState::new(task),
        })
    }
}

impl Scraper for FfprobeScraper {
    fn name(&self) -> &'static str {
        "FfprobeScraper"
    }

    fn scrape(&mut self) {
        let Some(path) = self.state.task.path().map(std::path::Path::to_owned) else {
            self.state.error("未给出文件名".to_owned());
            self.state.ensure_stream();
            return;
        };

        let result = match shell::run_on_file(
            "ffprobe",
            &[
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ],
            &path,
        ) {
            Ok(result) => result,
            Err(err) => {
                self.state.error(format!("无法启动 ffprobe: {err}"));
                self.state.ensure_stream();
                return;
            }
        };

        if !result.stderr.is_empty() {
            self.state.error(result.stderr.clone());
        }
        if !result.success() {
            if self.state.errors.is_empty() {
                self.state
                    .error(format!("ffprobe 以非零退出码 {} 退出", result.returncode));
            }
            self.state.ensure_stream();
            return;
        }

        let report: ProbeReport = match serde_json::from_str(&result.stdout) {
            Ok(report) => report,
            Err(err) => {
                self.state.error(format!("解析 ffprobe 输出失败: {err}"));
                self.state.ensure_stream();
                return;
            }
        };

        self.build_streams(&report);
        self.state.message("音视频结构解码完成".to_owned());
        self.state
            .check_supported(SUPPORTED, SupportTolerance::LOOSE_VERSION);
    }

    fn state(&self) -> &ScrapeState {
        &self.state
    }
}

impl FfprobeScraper {
    /// 把 ffprobe 报告翻译成流元数据列表
    fn build_streams(&mut self, report: &ProbeReport) {
        let format_name = report
            .format
            .as_ref()
            .map(|f| f.format_name.as_str())
            .unwrap_or("");

        let container = container_format(format_name);
        // WAV 按单轨音频处理, 其余容器格式占据流 0
        let mut index = 0;
        if let Some((mimetype, version)) = container {
            self.state.streams.push(StreamMetadata::new(
                0,
                mimetype,
                version,
                Some(StreamType::VideoContainer),
            ));
            index = 1;
        }

        for track in &report.streams {
            let Some((mimetype, version)) = codec_format(&track.codec_name) else {
                self.state.error(format!(
                    "不受支持的编码 {}, 轨道未被识别",
                    track.codec_name
                ));
                continue;
            };
            let stream_type = match track.codec_type.as_str() {
                "video" => StreamType::Video,
                "audio" => StreamType::Audio,
                _ => StreamType::Binary,
            };
            // MPEG 音频的代际由采样率决定
            let version = if mimetype == "audio/mpeg" && version == UNAV {
                mpeg_audio_version(track.sample_rate.as_deref())
            } else {
                version
            };
            let mut stream = StreamMetadata::new(index, mimetype, version, Some(stream_type));
            if let Some(width) = track.width {
                stream.set_attr("width", width.to_string());
            }
            if let Some(height) = track.height {
                stream.set_attr("height", height.to_string());
            }
            if let Some(rate) = &track.sample_rate {
                stream.set_attr("sample_rate", rate.clone());
            }
            if let Some(channels) = track.channels {
                stream.set_attr("channels", channels.to_string());
            }
            self.state.streams.push(stream);
            index += 1;
        }

        if self.state.streams.is_empty() {
            self.state
                .error("文件不含任何可识别的音视频轨".to_owned());
            self.state.ensure_stream();
        }
    }
}

/// 容器格式名到 (mimetype, version) 的映射; 单轨格式返回 None
fn container_format(format_name: &str) -> Option<(&'static str, &'static str)> {
    // ffprobe 的 format_name 可能是逗号分隔的别名列表
    let names: Vec<&str> = format_name.split(',').collect();
    if names.contains(&"wav") || names.contains(&"flac") || names.contains(&"mp3") {
        return None;
    }
    if names.contains(&"matroska") {
        return Some(("video/x-matroska", "4"));
    }
    if names.contains(&"mov") || names.contains(&"mp4") {
        return Some(("video/mp4", UNAP));
    }
    if names.contains(&"mpegts") {
        return Some(("video/MP2T", UNAP));
    }
    if names.contains(&"mpeg") {
        return Some(("video/MP2P", UNAP));
    }
    None
}

/// 按采样率推断 MPEG 音频代际.
///
/// MPEG-1 只允许 32/44.1/48 kHz; MPEG-2 (含 2.5 扩展) 使用
/// 折半的采样率族. 其余取值无法判定.
fn mpeg_audio_version(sample_rate: Option<&str>) -> &'static str {
    match sample_rate {
        Some("32000" | "44100" | "48000") => "1",
        Some("8000" | "11025" | "12000" | "16000" | "22050" | "24000") => "2",
        _ => UNAV,
    }
}

/// 编码名到 (mimetype, version) 的映射
fn codec_format(codec_name: &str) -> Option<(&'static str, &'static str)> {
    Some(match codec_name {
        "aac" => ("audio/mp4", UNAP),
        "h264" => ("video/mp4", UNAP),
        "mpeg1video" => ("video/mpeg", "1"),
        "mpeg2video" => ("video/mpeg", "2"),
        "mp1" | "mp2" | "mp3" => ("audio/mpeg", UNAV),
        "flac" => ("audio/flac", "1.2.1"),
        "pcm_u8" => ("audio/L8", UNAP),
        "pcm_s16le" | "pcm_s16be" => ("audio/L16", UNAP),
        "pcm_s24le" | "pcm_s24be" => ("audio/L24", UNAP),
        "ffv1" => ("video/x-ffv", "3"),
        "jpeg2000" => ("video/jpeg2000", UNAV),
        "dvvideo" => ("video/dv", UNAP),
        "wmav2" => ("audio/x-ms-wma", "9"),
        "wmv3" => ("video/x-ms-wmv", "9"),
        _ => return None,
    })
}

/// 注册条目
pub fn entry() -> ScraperEntry {
    ScraperEntry {
        name: "FfprobeScraper",
        only_wellformed: false,
        supported: SUPPORTED,
        extra_filter: None,
        factory: FfprobeScraper::create as ScraperFactory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jian_core::WellFormedness;

    fn scraper_with(report: &str) -> FfprobeScraper {
        let mut task = FileTask::new("t.mkv");
        task.mimetype = Some("video/x-matroska".to_owned());
        let mut scraper = FfprobeScraper {
            state: ScrapeState::new(task),
        };
        let report: ProbeReport = serde_json::from_str(report).unwrap();
        scraper.build_streams(&report);
        scraper
    }

    #[test]
    fn test_容器与轨道编号() {
        let scraper = scraper_with(
            r#"{
              "format": {"format_name": "matroska,webm"},
              "streams": [
                {"codec_name": "ffv1", "codec_type": "video", "width": 320, "height": 240},
                {"codec_name": "flac", "codec_type": "audio",
                 "sample_rate": "44100", "channels": 2}
              ]
            }"#,
        );
        let streams = scraper.streams();
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[0].mimetype, "video/x-matroska");
        assert_eq!(streams[0].stream_type, Some(StreamType::VideoContainer));
        assert_eq!(streams[1].mimetype, "video/x-ffv");
        assert_eq!(streams[1].attr("width"), Some("320"));
        assert_eq!(streams[2].mimetype, "audio/flac");
        assert_eq!(streams[2].attr("channels"), Some("2"));
    }

    #[test]
    fn test_wav_不产出容器流() {
        let scraper = scraper_with(
            r#"{
              "format": {"format_name": "wav"},
              "streams": [
                {"codec_name": "pcm_s16le", "codec_type": "audio",
                 "sample_rate": "48000", "channels": 1}
              ]
            }"#,
        );
        let streams = scraper.streams();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].index, 0);
        assert_eq!(streams[0].mimetype, "audio/L16");
        assert_eq!(streams[0].stream_type, Some(StreamType::Audio));
    }

    #[test]
    fn test_mpeg_音频版本按采样率推断() {
        let scraper = scraper_with(
            r#"{
              "format": {"format_name": "mp3"},
              "streams": [
                {"codec_name": "mp3", "codec_type": "audio",
                 "sample_rate": "44100", "channels": 2}
              ]
            }"#,
        );
        assert_eq!(scraper.streams()[0].mimetype, "audio/mpeg");
        assert_eq!(scraper.streams()[0].version, "1");

        let scraper = scraper_with(
            r#"{
              "format": {"format_name": "mp3"},
              "streams": [
                {"codec_name": "mp3", "codec_type": "audio",
                 "sample_rate": "22050", "channels": 2}
              ]
            }"#,
        );
        assert_eq!(scraper.streams()[0].version, "2");

        // 无采样率时不猜测
        assert_eq!(mpeg_audio_version(None), UNAV);
        assert_eq!(mpeg_audio_version(Some("96000")), UNAV);
    }

    #[test]
    fn test_未知编码记录错误() {
        let mut scraper = scraper_with(
            r#"{
              "format": {"format_name": "matroska,webm"},
              "streams": [{"codec_name": "snow", "codec_type": "video"}]
            }"#,
        );
        assert!(!scraper.state.errors.is_empty());
        scraper.state.message("音视频结构解码完成".to_owned());
        assert_eq!(scraper.well_formed(), WellFormedness::NotWellFormed);
    }
}
