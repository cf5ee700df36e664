//! 日志维护任务.
//!
//! 后台循环做三件事: 跨天时通知写入器切到新日期的文件,
//! 按保留期限删除过期历史, 把往日的明文日志压缩成 gzip.

use super::{LoggingConfig, log_path_for_date};
use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::error;

/// 跨天检测的轮询间隔 (秒)
const DATE_POLL_SECONDS: u64 = 30;

pub(super) fn spawn_log_maintenance_task(config: LoggingConfig, rotate_requested: Arc<AtomicBool>) {
    tokio::spawn(async move {
        let mut poll = tokio::time::interval(Duration::from_secs(DATE_POLL_SECONDS));
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let cleanup_every = Duration::from_secs(config.cleanup_interval_seconds.max(1));
        let mut current_date = Local::now().date_naive();
        let mut last_cleanup = tokio::time::Instant::now();

        if let Err(err) = run_maintenance(&config, current_date) {
            error!("日志维护启动失败: {err:#}");
        }

        loop {
            poll.tick().await;

            let today = Local::now().date_naive();
            let crossed_midnight = today != current_date;
            if crossed_midnight {
                current_date = today;
                // 写入线程在下一次写入时切到新日期的文件
                rotate_requested.store(true, Ordering::Release);
            }

            if crossed_midnight || last_cleanup.elapsed() >= cleanup_every {
                last_cleanup = tokio::time::Instant::now();
                if let Err(err) = run_maintenance(&config, today) {
                    error!("日志维护失败: {err:#}");
                }
            }
        }
    });
}

/// 日志目录里的一个历史文件
#[derive(Debug, PartialEq, Eq)]
enum HistoryFile {
    /// 明文日志, 待压缩
    Plain(NaiveDate),
    /// 已压缩的历史日志
    Compressed(NaiveDate),
}

impl HistoryFile {
    /// 从文件名识别历史日志; 无关文件返回 None
    fn classify(file_name: &str, prefix: &str) -> Option<Self> {
        let rest = file_name.strip_prefix(prefix)?.strip_prefix('.')?;
        if let Some(date) = rest.strip_suffix(".log") {
            return Some(Self::Plain(parse_log_date(date)?));
        }
        if let Some(date) = rest.strip_suffix(".log.gz") {
            return Some(Self::Compressed(parse_log_date(date)?));
        }
        None
    }

    fn date(&self) -> NaiveDate {
        match self {
            Self::Plain(date) | Self::Compressed(date) => *date,
        }
    }
}

fn parse_log_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// 一轮维护: 确保当天文件存在, 删除过期历史, 压缩往日明文日志.
///
/// 单个文件的失败只记日志, 不中断整轮扫描.
fn run_maintenance(config: &LoggingConfig, today: NaiveDate) -> Result<()> {
    let directory = Path::new(&config.directory);
    fs::create_dir_all(directory)?;

    let current_path = log_path_for_date(directory, &config.file_prefix, today);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&current_path)
        .with_context(|| format!("创建当天日志文件失败, path={}", current_path.display()))?;

    let cutoff = today - ChronoDuration::days(config.retention_days);
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(history) = HistoryFile::classify(&file_name, &config.file_prefix) else {
            continue;
        };

        if history.date() < cutoff {
            if let Err(err) = fs::remove_file(entry.path()) {
                error!("删除过期日志 {file_name} 失败: {err}");
            }
            continue;
        }

        if config.compress_history
            && history.date() < today
            && matches!(history, HistoryFile::Plain(_))
        {
            if let Err(err) = compress_history_log(&entry.path()) {
                error!("压缩历史日志 {file_name} 失败: {err:#}");
            }
        }
    }

    Ok(())
}

/// 把明文历史日志压缩成 `.log.gz` 并删除原文件
fn compress_history_log(path: &Path) -> Result<()> {
    let gz_path = path.with_extension("log.gz");
    if gz_path.exists() {
        return Ok(());
    }

    let mut input =
        File::open(path).with_context(|| format!("打开待压缩日志失败, path={}", path.display()))?;
    let output = File::create(&gz_path)
        .with_context(|| format!("创建压缩日志失败, path={}", gz_path.display()))?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    std::io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
        .with_context(|| format!("删除已压缩日志失败, path={}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::{Read, Write};
    use tempfile::TempDir;

    #[test]
    fn test_历史日志文件识别() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_eq!(
            HistoryFile::classify("jian.2026-08-23.log", "jian"),
            Some(HistoryFile::Plain(date))
        );
        assert_eq!(
            HistoryFile::classify("jian.2026-08-23.log.gz", "jian"),
            Some(HistoryFile::Compressed(date))
        );
        assert_eq!(HistoryFile::classify("jian.log", "jian"), None);
        assert_eq!(HistoryFile::classify("other.2026-08-23.log", "jian"), None);
        assert_eq!(HistoryFile::classify("jian.not-a-date.log", "jian"), None);
    }

    #[test]
    fn test_维护清理过期并压缩历史() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            directory: temp_dir.path().to_string_lossy().into_owned(),
            retention_days: 7,
            ..LoggingConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        let directory = temp_dir.path();

        // 过期、昨天明文、今天当前
        let expired = log_path_for_date(directory, "jian", today - ChronoDuration::days(30));
        fs::write(&expired, b"old\n").unwrap();
        let yesterday = log_path_for_date(directory, "jian", today - ChronoDuration::days(1));
        let mut f = File::create(&yesterday).unwrap();
        f.write_all(b"yesterday entry\n").unwrap();
        drop(f);

        run_maintenance(&config, today).unwrap();

        assert!(!expired.exists(), "过期日志应被删除");
        assert!(!yesterday.exists(), "昨天的明文日志应被压缩后删除");
        let gz_path = yesterday.with_extension("log.gz");
        assert!(gz_path.exists());
        let mut decoded = String::new();
        GzDecoder::new(File::open(&gz_path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "yesterday entry\n");

        // 当天文件被创建且保持为空
        let current = log_path_for_date(directory, "jian", today);
        assert!(current.exists());
        assert_eq!(current.metadata().unwrap().len(), 0);
    }

    #[test]
    fn test_已有压缩文件不重复压缩() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            directory: temp_dir.path().to_string_lossy().into_owned(),
            ..LoggingConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        let yesterday =
            log_path_for_date(temp_dir.path(), "jian", today - ChronoDuration::days(1));
        fs::write(&yesterday, b"plain\n").unwrap();
        fs::write(yesterday.with_extension("log.gz"), b"existing").unwrap();

        run_maintenance(&config, today).unwrap();

        // 已存在 gz 时跳过压缩, 明文原样保留
        assert!(yesterday.exists());
        assert_eq!(
            fs::read(yesterday.with_extension("log.gz")).unwrap(),
            b"existing"
        );
    }
}
