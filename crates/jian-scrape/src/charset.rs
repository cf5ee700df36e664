//! 字符集标签处理.
//!
//! 不同来源 (XML 声明、调用方参数、BOM 检测) 报告的字符集
//! 标签大小写与别名各异, 统一归一到规范名后再写入流属性,
//! 避免同义标签在流合并与评级时被当作取值冲突.

use encoding_rs::Encoding;

/// 归一字符集标签 (如 "utf-8" -> "UTF-8").
///
/// UTF-16/UTF-32 折叠字节序变体; 未知标签原样转大写.
pub fn normalize_label(label: &str) -> String {
    let trimmed = label.trim();
    let upper = trimmed.to_ascii_uppercase();
    if upper.starts_with("UTF-16") || upper == "UTF16" {
        return "UTF-16".to_owned();
    }
    if upper.starts_with("UTF-32") || upper == "UTF32" {
        return "UTF-32".to_owned();
    }
    match Encoding::for_label(trimmed.as_bytes()) {
        Some(encoding) => encoding.name().to_owned(),
        None => upper,
    }
}

/// 从 XML 声明读出声明的编码 (归一后).
///
/// 只扫描头部少量字节; UTF-16/32 编码的文档读不出 ASCII 声明,
/// 交给 BOM 检测兜底.
pub fn xml_declared_encoding(data: &[u8]) -> Option<String> {
    let head = data.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(data);
    let head = &head[..head.len().min(256)];
    if !head.starts_with(b"<?xml") {
        return None;
    }

    let pos = head.windows(9).position(|w| w == b"encoding=")?;
    let rest = &head[pos + 9..];
    let quote = *rest.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let label: String = rest[1..]
        .iter()
        .take_while(|b| **b != quote)
        .map(|b| *b as char)
        .collect();
    if label.is_empty() {
        return None;
    }
    Some(normalize_label(&label))
}
