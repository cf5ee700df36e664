//! 刮取器注册表.
//!
//! 固定顺序的刮取器条目列表: 给定 (mimetype, version, 校验模式,
//! 配置选项), 按注册顺序产出所有声明支持的刮取器; 无一匹配时
//! 产出哨兵 "未找到刮取器" 条目. 顺序即优先级: 流元数据合并
//! 采用 "先到者优先" 语义.

use jian_core::is_unav;

use crate::metadata::{FormatSupport, any_supported};
use crate::scraper::Scraper;
use crate::task::{FileTask, ScrapeParams};

/// 刮取器工厂函数类型
pub type ScraperFactory = fn(FileTask) -> Box<dyn Scraper>;

/// 附加匹配条件 (如 schematron 选项出现时 XML 通用刮取器让位)
pub type SupportFilter = fn(&ScrapeParams) -> bool;

/// 刮取器注册条目
///
/// 静态声明一个刮取器的能力范围与构造方式.
pub struct ScraperEntry {
    /// 刮取器名称 (唯一)
    pub name: &'static str,
    /// 是否仅支持完好性检查 (仅识别模式下跳过)
    pub only_wellformed: bool,
    /// 支持的格式范围
    pub supported: &'static [FormatSupport],
    /// 附加匹配条件; `None` 表示无附加条件
    pub extra_filter: Option<SupportFilter>,
    /// 工厂函数
    pub factory: ScraperFactory,
}

impl ScraperEntry {
    /// 判断本条目是否适用于给定的格式与校验模式
    pub fn is_supported(
        &self,
        mimetype: &str,
        version: &str,
        check_wellformed: bool,
        params: &ScrapeParams,
    ) -> bool {
        if is_unav(mimetype) {
            return false;
        }
        if self.only_wellformed && !check_wellformed {
            return false;
        }
        if let Some(filter) = self.extra_filter {
            if !filter(params) {
                return false;
            }
        }
        any_supported(self.supported, mimetype, version)
    }
}

/// 刮取器注册表
pub struct ScraperRegistry {
    /// 注册条目 (顺序即优先级)
    entries: Vec<ScraperEntry>,
    /// 哨兵条目: 无一匹配时产出
    not_found: ScraperEntry,
}

impl ScraperRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            not_found: crate::scrapers::dummy::not_found_entry(),
        }
    }

    /// 注册一个刮取器条目 (追加到列表末尾).
    ///
    /// 同名重复注册是编程错误, 启动期立即失败.
    pub fn register(&mut self, entry: ScraperEntry) {
        assert!(
            self.entries.iter().all(|e| e.name != entry.name),
            "刮取器重复注册: {}",
            entry.name
        );
        self.entries.push(entry);
    }

    /// 所有注册条目
    pub fn entries(&self) -> &[ScraperEntry] {
        &self.entries
    }

    /// 产出所有适用的刮取器条目 (按注册顺序).
    ///
    /// 无一匹配时返回哨兵 "未找到刮取器" 条目: 无法归类的文件
    /// 绝不能被评为 "可能有效".
    pub fn scrapers_for(
        &self,
        mimetype: &str,
        version: &str,
        check_wellformed: bool,
        params: &ScrapeParams,
    ) -> Vec<&ScraperEntry> {
        let matched: Vec<&ScraperEntry> = self
            .entries
            .iter()
            .filter(|e| e.is_supported(mimetype, version, check_wellformed, params))
            .collect();

        if matched.is_empty() {
            return vec![&self.not_found];
        }
        matched
    }

    /// 判断给定格式是否有任何刮取器声明支持
    pub fn has_scraper(&self, mimetype: &str, version: &str) -> bool {
        !is_unav(mimetype)
            && self
                .entries
                .iter()
                .any(|e| any_supported(e.supported, mimetype, version))
    }
}

impl Default for ScraperRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        crate::scrapers::register_all_scrapers(&mut registry);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jian_core::{UNAP, UNAV};

    #[test]
    fn test_注册表_按顺序产出匹配条目() {
        let registry = ScraperRegistry::default();
        let params = ScrapeParams::default();
        let entries = registry.scrapers_for("text/xml", "1.0", true, &params);
        let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
        // XML 完好性检查 + 文本字符集 + 签名元数据
        assert!(names.contains(&"XmlScraper"));
        assert!(names.contains(&"TextfileScraper"));
        assert!(names.contains(&"MagicScraper"));
    }

    #[test]
    fn test_注册表_仅识别模式跳过完好性刮取器() {
        let registry = ScraperRegistry::default();
        let params = ScrapeParams::default();
        let entries = registry.scrapers_for("text/xml", "1.0", false, &params);
        let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
        assert!(!names.contains(&"XmlScraper"));
        assert!(names.contains(&"TextfileScraper"));
    }

    #[test]
    fn test_注册表_schematron_让位() {
        let registry = ScraperRegistry::default();
        let params = ScrapeParams {
            schematron: Some("schema.sch".into()),
            ..Default::default()
        };
        let entries = registry.scrapers_for("text/xml", "1.0", true, &params);
        let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
        assert!(!names.contains(&"XmlScraper"));
    }

    #[test]
    fn test_注册表_未找到时产出哨兵() {
        let registry = ScraperRegistry::default();
        let params = ScrapeParams::default();
        let entries = registry.scrapers_for("application/x-nonexistent", UNAP, true, &params);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ScraperNotFound");

        let entries = registry.scrapers_for(UNAV, UNAV, true, &params);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ScraperNotFound");
    }

    #[test]
    #[should_panic(expected = "刮取器重复注册")]
    fn test_注册表_重复注册立即失败() {
        let mut registry = ScraperRegistry::default();
        registry.register(crate::scrapers::magic::entry());
    }
}
