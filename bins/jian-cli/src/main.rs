//! jian - 文件格式鉴定命令行工具
//!
//! 对单个文件做格式识别、完好性校验、元数据刮取与数字保存
//! 评级, 以文本或 JSON 形式输出结论.

use std::collections::BTreeMap;
use std::process;

use clap::Parser;
use serde::Serialize;
use tracing::info;

use jian_core::{Algorithm, WellFormedness};
use jian_grade::{Grade, grade_scraper};
use jian_scrape::{FileScraper, ScrapeParams};

mod logging;

/// Jian 文件格式鉴定工具
#[derive(Parser, Debug)]
#[command(name = "jian", version, about = "纯 Rust 文件格式鉴定与数字保存评级工具")]
struct Cli {
    /// 输入文件路径
    input: String,

    /// 预定义 MIME 类型 (与刮取结论不一致时判为不完好)
    #[arg(long)]
    mimetype: Option<String>,

    /// 预定义格式版本
    #[arg(long = "format-version")]
    format_version: Option<String>,

    /// 强制字符集 (跳过字符集检测, 仅验证)
    #[arg(long)]
    charset: Option<String>,

    /// CSV 分隔符 (默认逗号)
    #[arg(long)]
    delimiter: Option<String>,

    /// 仅识别格式与刮取元数据, 不做完好性校验
    #[arg(long)]
    identify_only: bool,

    /// 附带计算校验和 (sha256 或 sha512)
    #[arg(long)]
    checksum: Option<String>,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 提升日志详细程度 (-v info, -vv debug)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ============================================================
// JSON 输出结构体
// ============================================================

/// 完整鉴定结论
#[derive(Serialize)]
struct ScrapeOutput {
    path: String,
    mimetype: String,
    version: String,
    /// true/false/null 对应 完好/不完好/未判定
    well_formed: Option<bool>,
    grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<ChecksumInfo>,
    streams: Vec<StreamInfo>,
    scrapers: Vec<ScraperReport>,
}

/// 校验和
#[derive(Serialize)]
struct ChecksumInfo {
    algorithm: String,
    value: String,
}

/// 单条流的元数据
#[derive(Serialize)]
struct StreamInfo {
    index: usize,
    mimetype: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_type: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attrs: BTreeMap<String, String>,
}

/// 单个刮取器的执行记录
#[derive(Serialize)]
struct ScraperReport {
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    messages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

// ============================================================
// 主逻辑
// ============================================================

fn main() {
    let cli = Cli::parse();
    logging::init("jian", cli.verbose);

    let algorithm = match cli.checksum.as_deref().map(Algorithm::from_name) {
        None => None,
        Some(Ok(algorithm)) => Some(algorithm),
        Some(Err(e)) => {
            eprintln!("错误: {e}");
            process::exit(2);
        }
    };

    let params = ScrapeParams {
        charset: cli.charset.clone(),
        delimiter: cli.delimiter.clone(),
        ..Default::default()
    };

    let mut scraper = FileScraper::new(&cli.input).with_params(params);
    if let Some(mimetype) = &cli.mimetype {
        scraper = scraper.with_mimetype(mimetype.clone());
    }
    if let Some(version) = &cli.format_version {
        scraper = scraper.with_version(version.clone());
    }

    info!("开始鉴定: {}", cli.input);
    scraper.scrape(!cli.identify_only);
    let grade = grade_scraper(&scraper);
    let well_formed = scraper.well_formed();

    let checksum = algorithm.and_then(|algorithm| match scraper.checksum(algorithm) {
        Ok(value) => Some(ChecksumInfo {
            algorithm: format!("{algorithm:?}").to_lowercase(),
            value,
        }),
        Err(e) => {
            eprintln!("警告: 校验和计算失败: {e}");
            None
        }
    });

    let output = build_output(&cli.input, &scraper, well_formed, grade, checksum);

    if cli.json {
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("错误: 序列化输出失败: {e}");
                process::exit(2);
            }
        }
    } else {
        print_text(&output);
    }

    // 不完好以退出码 1 报告; 未判定不算失败
    if well_formed == WellFormedness::NotWellFormed {
        process::exit(1);
    }
}

/// 汇总鉴定结论
fn build_output(
    path: &str,
    scraper: &FileScraper,
    well_formed: WellFormedness,
    grade: Grade,
    checksum: Option<ChecksumInfo>,
) -> ScrapeOutput {
    let streams = scraper
        .streams()
        .iter()
        .map(|s| StreamInfo {
            index: s.index,
            mimetype: s.mimetype.clone(),
            version: s.version.clone(),
            stream_type: s.stream_type.map(|t| t.as_str().to_owned()),
            attrs: s.attrs.clone(),
        })
        .collect();

    let scrapers = scraper
        .info()
        .iter()
        .map(|i| ScraperReport {
            name: i.name.to_owned(),
            messages: i.messages.clone(),
            errors: i.errors.clone(),
        })
        .collect();

    ScrapeOutput {
        path: path.to_owned(),
        mimetype: scraper.mimetype(),
        version: scraper.version(),
        well_formed: match well_formed {
            WellFormedness::WellFormed => Some(true),
            WellFormedness::NotWellFormed => Some(false),
            WellFormedness::Undetermined => None,
        },
        grade: grade.as_str().to_owned(),
        checksum,
        streams,
        scrapers,
    }
}

/// 文本格式输出
fn print_text(output: &ScrapeOutput) {
    println!("[FILE]");
    println!("  文件         : {}", output.path);
    println!("  MIME 类型    : {}", output.mimetype);
    println!("  格式版本     : {}", output.version);
    println!(
        "  完好性       : {}",
        match output.well_formed {
            Some(true) => "完好",
            Some(false) => "不完好",
            None => "未判定",
        }
    );
    println!("  保存评级     : {}", output.grade);
    if let Some(ref checksum) = output.checksum {
        println!("  校验和       : {} ({})", checksum.value, checksum.algorithm);
    }
    println!("[/FILE]");
    println!();

    for stream in &output.streams {
        println!("[STREAM #{}]", stream.index);
        println!("  MIME 类型    : {}", stream.mimetype);
        println!("  格式版本     : {}", stream.version);
        if let Some(ref stream_type) = stream.stream_type {
            println!("  流类型       : {stream_type}");
        }
        for (key, value) in &stream.attrs {
            println!("  {key:<12} : {value}");
        }
        println!("[/STREAM]");
        println!();
    }

    for report in &output.scrapers {
        if report.messages.is_empty() && report.errors.is_empty() {
            continue;
        }
        println!("[SCRAPER {}]", report.name);
        for msg in &report.messages {
            println!("  消息: {}", msg.trim_end());
        }
        for err in &report.errors {
            println!("  错误: {}", err.trim_end());
        }
        println!("[/SCRAPER]");
        println!();
    }
}
