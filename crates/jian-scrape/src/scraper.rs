//! 刮取器契约与执行状态.
//!
//! 刮取器是绑定到一个文件的工作单元: 静态声明支持的
//! (mimetype, version) 组合与校验模式, 执行后产出零或多条
//! 流元数据、人类可读消息、错误字符串和一个三态完好性判定.
//!
//! 所有失败 (外部工具崩溃、非零退出、输出乱码) 都在刮取器
//! 边界内转换为数据, 绝不向聚合器抛出异常.

use jian_core::{WellFormedness, is_concrete, is_unap, is_unav};

use crate::metadata::{FormatSupport, StreamMetadata};
use crate::task::FileTask;

/// 一致性检查的容忍开关
///
/// 部分刮取器 (如仅做完好性检查的外部工具包装) 合法地
/// 无法确定 mimetype 或版本, 通过容忍开关放行占位符值.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupportTolerance {
    /// 接受 `(:unav)` mimetype
    pub allow_unav_mime: bool,
    /// 接受 `(:unav)` 版本
    pub allow_unav_version: bool,
    /// 接受 `(:unap)` 版本
    pub allow_unap_version: bool,
}

impl SupportTolerance {
    /// 不放行任何占位符
    pub const STRICT: Self = Self {
        allow_unav_mime: false,
        allow_unav_version: false,
        allow_unap_version: false,
    };

    /// 放行占位符版本 (mimetype 仍须确定)
    pub const LOOSE_VERSION: Self = Self {
        allow_unav_mime: false,
        allow_unav_version: true,
        allow_unap_version: true,
    };

    /// 放行占位符 mimetype 与版本
    pub const LOOSE: Self = Self {
        allow_unav_mime: true,
        allow_unav_version: true,
        allow_unap_version: true,
    };
}

/// 刮取器执行状态
///
/// 每个刮取器内嵌一份, 承载消息/错误/流列表, 并提供
/// 默认完好性计算与支持范围一致性检查.
#[derive(Debug)]
pub struct ScrapeState {
    /// 本次执行绑定的任务
    pub task: FileTask,
    /// 人类可读消息
    pub messages: Vec<String>,
    /// 错误字符串
    pub errors: Vec<String>,
    /// 产出的流元数据
    pub streams: Vec<StreamMetadata>,
}

impl ScrapeState {
    /// 创建空状态
    pub fn new(task: FileTask) -> Self {
        Self {
            task,
            messages: Vec::new(),
            errors: Vec::new(),
            streams: Vec::new(),
        }
    }

    /// 追加消息
    pub fn message(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    /// 追加错误
    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// 默认完好性计算.
    ///
    /// 仅识别模式下不做判定; 否则有错误即不完好,
    /// 有消息且无错误即完好.
    pub fn default_well_formed(&self) -> WellFormedness {
        if !self.task.check_wellformed {
            return WellFormedness::Undetermined;
        }
        if !self.errors.is_empty() {
            return WellFormedness::NotWellFormed;
        }
        if !self.messages.is_empty() {
            return WellFormedness::WellFormed;
        }
        WellFormedness::NotWellFormed
    }

    /// 保证流列表非空.
    ///
    /// 刮取器在任何退出路径上都必须至少产出一条流
    /// (彻底失败时为占位 "未知流"), 下游永远不会看到空流列表.
    pub fn ensure_stream(&mut self) {
        if self.streams.is_empty() {
            self.streams.push(StreamMetadata::unknown(0));
        }
    }

    /// 刮取后的一致性检查.
    ///
    /// 校验本刮取器的最终 mimetype/version (以流 0 为准,
    /// 流缺失时退回任务预定值) 落在其声明的支持范围内;
    /// 不匹配时追加错误.
    pub fn check_supported(&mut self, supported: &[FormatSupport], tolerance: SupportTolerance) {
        let (mimetype, version) = match self.streams.first() {
            Some(stream) => (stream.mimetype.clone(), stream.version.clone()),
            None => (
                self.task.mimetype_or_unav().to_owned(),
                self.task.version_or_unav().to_owned(),
            ),
        };

        if is_unav(&mimetype) {
            if !tolerance.allow_unav_mime {
                self.error("MIME 类型无法确定".to_owned());
            }
            return;
        }

        let version_tolerated = (is_unav(&version) && tolerance.allow_unav_version)
            || (is_unap(&version) && tolerance.allow_unap_version);

        let matched = supported.iter().any(|s| {
            s.mimetype.eq_ignore_ascii_case(&mimetype)
                && (s.allow_any_version
                    || version_tolerated
                    || (is_concrete(&version) && s.versions.contains(&version.as_str())))
        });

        if !matched {
            self.error(format!(
                "MIME 类型 {mimetype} 及版本 {version} 不在刮取器支持范围内"
            ));
        }
    }
}

/// 刮取器 trait
///
/// `scrape()` 是唯一有副作用的操作: 无论成功、工具失败还是
/// 内部异常, 退出时消息/错误/流列表都必须处于一致状态.
pub trait Scraper {
    /// 刮取器名称 (用于诊断输出)
    fn name(&self) -> &'static str;

    /// 执行刮取
    fn scrape(&mut self);

    /// 执行状态 (消息/错误/流)
    fn state(&self) -> &ScrapeState;

    /// 产出的流元数据
    fn streams(&self) -> &[StreamMetadata] {
        &self.state().streams
    }

    /// 人类可读消息
    fn messages(&self) -> &[String] {
        &self.state().messages
    }

    /// 错误字符串
    fn errors(&self) -> &[String] {
        &self.state().errors
    }

    /// 完好性判定; 默认按执行状态计算, 个别刮取器覆盖
    fn well_formed(&self) -> WellFormedness {
        self.state().default_well_formed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jian_core::{UNAP, UNAV};

    fn task(check_wellformed: bool) -> FileTask {
        FileTask {
            path: None,
            mimetype: Some("image/png".to_owned()),
            version: Some("1.2".to_owned()),
            check_wellformed,
            params: Default::default(),
        }
    }

    #[test]
    fn test_默认完好性() {
        let mut state = ScrapeState::new(task(true));
        // 无消息无错误: 不完好
        assert_eq!(state.default_well_formed(), WellFormedness::NotWellFormed);
        state.message("分析成功");
        assert_eq!(state.default_well_formed(), WellFormedness::WellFormed);
        state.error("坏块");
        assert_eq!(state.default_well_formed(), WellFormedness::NotWellFormed);
    }

    #[test]
    fn test_仅识别模式不判定() {
        let mut state = ScrapeState::new(task(false));
        state.message("分析成功");
        assert_eq!(state.default_well_formed(), WellFormedness::Undetermined);
    }

    #[test]
    fn test_一致性检查_匹配与不匹配() {
        const SUPPORTED: &[FormatSupport] = &[FormatSupport::new("image/png", &["1.2"])];

        let mut state = ScrapeState::new(task(true));
        state
            .streams
            .push(StreamMetadata::new(0, "image/png", "1.2", None));
        state.check_supported(SUPPORTED, SupportTolerance::STRICT);
        assert!(state.errors.is_empty());

        let mut state = ScrapeState::new(task(true));
        state
            .streams
            .push(StreamMetadata::new(0, "image/gif", "1989a", None));
        state.check_supported(SUPPORTED, SupportTolerance::STRICT);
        assert_eq!(state.errors.len(), 1);
    }

    #[test]
    fn test_一致性检查_容忍占位符() {
        const SUPPORTED: &[FormatSupport] = &[FormatSupport::new("image/png", &["1.2"])];

        let mut state = ScrapeState::new(task(true));
        state
            .streams
            .push(StreamMetadata::new(0, UNAV, UNAV, None));
        state.check_supported(SUPPORTED, SupportTolerance::LOOSE);
        assert!(state.errors.is_empty());

        let mut state = ScrapeState::new(task(true));
        state
            .streams
            .push(StreamMetadata::new(0, "image/png", UNAP, None));
        state.check_supported(SUPPORTED, SupportTolerance::LOOSE_VERSION);
        assert!(state.errors.is_empty());
    }

    #[test]
    fn test_占位流兜底() {
        let mut state = ScrapeState::new(task(true));
        state.ensure_stream();
        assert_eq!(state.streams.len(), 1);
        assert_eq!(state.streams[0].mimetype, UNAV);
    }
}
