//! 日志系统配置模块
//! 结构化日志（json/text）+ 可选按天轮转的文件日志

use std::path::Path;

use anyhow::Context;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling,
};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_LOG_FILE: &str = "dotbit.log";

/// 初始化日志系统
///
/// 开启文件日志时返回 `WorkerGuard`，调用方需持有到进程退出，否则缓冲日志会丢失。
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let json = config.is_json();

    let stdout_layer = if json {
        fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .boxed()
    } else {
        fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .boxed()
    };

    let (file_layer, guard) = match file_writer(config)? {
        Some((writer, guard)) => {
            let layer = if json {
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_timer(ChronoUtc::rfc_3339())
                    .boxed()
            } else {
                fmt::layer()
                    .with_writer(writer)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn file_writer(config: &LoggingConfig) -> anyhow::Result<Option<(NonBlocking, WorkerGuard)>> {
    if !config.enable_file_logging {
        return Ok(None);
    }

    let (dir, file_name) = log_file_location(config.log_file_path.as_deref());
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {:?}", dir))?;

    let appender = rolling::daily(dir, file_name);
    Ok(Some(tracing_appender::non_blocking(appender)))
}

/// 拆分日志路径为（目录, 文件名前缀）
fn log_file_location(path: Option<&str>) -> (&Path, &str) {
    let path = path.map(Path::new);
    let dir = path
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new(DEFAULT_LOG_DIR));
    let file_name = path
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);
    (dir, file_name)
}

/// 简化初始化（使用默认配置）
pub fn init_default_logging() -> Option<WorkerGuard> {
    let config = LoggingConfig::default();
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logging: {}", e);
        // 回退到最基本的日志初始化
        let _ = tracing_subscriber::fmt().try_init();
        None
    })
}
