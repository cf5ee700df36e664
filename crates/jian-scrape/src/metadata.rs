//! 流元数据契约.
//!
//! 刮取器以统一的形状报告异构格式的技术元数据: 每条逻辑流
//! (容器、音轨、视频轨、页面) 对应一个 [`StreamMetadata`].
//! 缺失值用占位符表达, 不适用的属性直接省略, 绝不填充假值.

use std::collections::BTreeMap;

use jian_core::{StreamType, UNAV, is_concrete, is_unap, is_unav};

/// 刮取器声明的格式支持范围
///
/// 一个刮取器可声明多条支持范围, 每条对应一个 MIME 类型及
/// 其版本列表.
#[derive(Debug, Clone, Copy)]
pub struct FormatSupport {
    /// 支持的 MIME 类型
    pub mimetype: &'static str,
    /// 支持的版本列表
    pub versions: &'static [&'static str],
    /// 是否接受列表之外的任意版本
    pub allow_any_version: bool,
}

impl FormatSupport {
    /// 声明固定版本列表的支持范围
    pub const fn new(mimetype: &'static str, versions: &'static [&'static str]) -> Self {
        Self {
            mimetype,
            versions,
            allow_any_version: false,
        }
    }

    /// 声明接受任意版本的支持范围
    pub const fn any_version(mimetype: &'static str) -> Self {
        Self {
            mimetype,
            versions: &[],
            allow_any_version: true,
        }
    }

    /// 判断 (mimetype, version) 是否落在本支持范围内.
    ///
    /// 版本为占位符 (`(:unav)`/`(:unap)`) 时视为支持:
    /// 识别阶段常常还没有版本信息.
    pub fn is_supported(&self, mimetype: &str, version: &str) -> bool {
        if !self.mimetype.eq_ignore_ascii_case(mimetype) {
            return false;
        }
        self.allow_any_version
            || is_unav(version)
            || is_unap(version)
            || self.versions.contains(&version)
    }
}

/// 判断支持范围列表中是否有任一条目支持 (mimetype, version)
pub fn any_supported(supported: &[FormatSupport], mimetype: &str, version: &str) -> bool {
    supported.iter().any(|s| s.is_supported(mimetype, version))
}

/// 一条逻辑流的技术元数据
///
/// 每个实例恰好属于一次刮取器执行的结果, 不跨文件共享.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMetadata {
    /// 流索引 (在文件中的位置, 容器为 0)
    pub index: usize,
    /// 流的 MIME 类型
    pub mimetype: String,
    /// 流的格式版本
    pub version: String,
    /// 流类型; `None` 表示本刮取器未能判定
    pub stream_type: Option<StreamType>,
    /// 格式特定的可选属性 (charset, codec, width...);
    /// 不适用的属性不出现在表中
    pub attrs: BTreeMap<String, String>,
}

impl StreamMetadata {
    /// 创建占位流 (格式未知)
    pub fn unknown(index: usize) -> Self {
        Self {
            index,
            mimetype: UNAV.to_owned(),
            version: UNAV.to_owned(),
            stream_type: None,
            attrs: BTreeMap::new(),
        }
    }

    /// 创建带格式信息的流
    pub fn new(
        index: usize,
        mimetype: impl Into<String>,
        version: impl Into<String>,
        stream_type: Option<StreamType>,
    ) -> Self {
        Self {
            index,
            mimetype: mimetype.into(),
            version: version.into(),
            stream_type,
            attrs: BTreeMap::new(),
        }
    }

    /// 设置可选属性
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// 读取可选属性
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// 合并另一个刮取器对同一条流的报告.
    ///
    /// 先到者优先: 已有具体值保留, 占位符空缺被填补;
    /// 两个具体值冲突时记录错误.
    pub fn merge_from(&mut self, other: &StreamMetadata, errors: &mut Vec<String>) {
        merge_value(&mut self.mimetype, &other.mimetype, "mimetype", self.index, errors);
        merge_value(&mut self.version, &other.version, "version", self.index, errors);

        if self.stream_type.is_none() {
            self.stream_type = other.stream_type;
        } else if other.stream_type.is_some() && self.stream_type != other.stream_type {
            errors.push(format!(
                "流 {} 的 stream_type 取值冲突: {} 与 {}",
                self.index,
                self.stream_type.map_or("(:unav)", |t| t.as_str()),
                other.stream_type.map_or("(:unav)", |t| t.as_str()),
            ));
        }

        for (key, value) in &other.attrs {
            match self.attrs.get(key) {
                None => {
                    self.attrs.insert(key.clone(), value.clone());
                }
                Some(existing) if is_unav(existing) && is_concrete(value) => {
                    self.attrs.insert(key.clone(), value.clone());
                }
                Some(existing) if existing != value && is_concrete(value) && is_concrete(existing) => {
                    errors.push(format!(
                        "流 {} 的属性 {key} 取值冲突: {existing} 与 {value}",
                        self.index
                    ));
                }
                Some(_) => {}
            }
        }
    }
}

/// 合并单个格式字段: `(:unav)` 视为空缺, 其余值冲突报错
fn merge_value(
    current: &mut String,
    incoming: &str,
    field: &str,
    index: usize,
    errors: &mut Vec<String>,
) {
    if is_unav(current) {
        if !is_unav(incoming) {
            *current = incoming.to_owned();
        }
        return;
    }
    if !is_unav(incoming) && current != incoming {
        errors.push(format!(
            "流 {index} 的 {field} 取值冲突: {current} 与 {incoming}"
        ));
    }
}

/// 按 MIME 类型大类推断流类型
pub fn stream_type_for_mimetype(mimetype: &str) -> Option<StreamType> {
    let lower = mimetype.to_ascii_lowercase();
    if lower.starts_with("text/")
        || lower == "application/xhtml+xml"
        || lower == "image/svg+xml"
    {
        return Some(StreamType::Text);
    }
    if lower.starts_with("image/") {
        return Some(StreamType::Image);
    }
    if lower.starts_with("audio/") {
        return Some(StreamType::Audio);
    }
    if lower.starts_with("video/") {
        return Some(StreamType::Video);
    }
    if is_concrete(mimetype) {
        return Some(StreamType::Binary);
    }
    None
}
