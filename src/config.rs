//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::{fmt, path::Path, str::FromStr};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indexer: IndexerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// .bit 网络
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitNetwork {
    #[default]
    Mainnet,
    Testnet,
}

impl BitNetwork {
    /// 官方 indexer 地址
    pub fn default_indexer_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://indexer-v1.did.id",
            Self::Testnet => "https://test-indexer.did.id",
        }
    }
}

impl FromStr for BitNetwork {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => anyhow::bail!("Unknown .bit network: {}", other),
        }
    }
}

impl fmt::Display for BitNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => f.write_str("mainnet"),
            Self::Testnet => f.write_str("testnet"),
        }
    }
}

/// Indexer配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    #[serde(default)]
    pub network: BitNetwork,
    /// 为空时使用网络对应的官方地址
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl IndexerConfig {
    pub fn endpoint(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| self.network.default_indexer_url().to_string())
    }
}

/// 账户缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
    pub enable_file_logging: bool,
    pub log_file_path: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            network: std::env::var("DOTBIT_NETWORK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            url: std::env::var("DOTBIT_INDEXER_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            timeout_ms: std::env::var("DOTBIT_INDEXER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout_ms),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: std::env::var("DOTBIT_CACHE_ENABLED")
                .ok()
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
            enable_file_logging: std::env::var("LOG_FILE_ENABLED")
                .ok()
                .map(|v| v == "1")
                .unwrap_or(false),
            log_file_path: std::env::var("LOG_FILE_PATH").ok(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            indexer: IndexerConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        })
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) if path.as_ref().exists() => Self::from_file(path),
            _ => Self::from_env(),
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.indexer.endpoint();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            anyhow::bail!("Indexer url must start with http:// or https://, got {}", endpoint);
        }

        if self.indexer.timeout_ms == 0 {
            anyhow::bail!("DOTBIT_INDEXER_TIMEOUT_MS must be greater than 0");
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        // 验证日志格式
        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        Ok(())
    }
}
