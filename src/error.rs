//! 统一错误类型
//!
//! 输入校验错误在任何 I/O 之前抛出；索引器错误原样透传，
//! 只有 `exist()` 会在本地吞掉“账户不存在”。

use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, DotbitError>;

/// 索引器错误码（das indexer errno）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexerErrorCode {
    /// 参数无效
    ParamsInvalid,
    /// 方法不存在
    MethodNotExist,
    /// 索引器数据库错误
    DbError,
    /// 账户格式无效
    AccountFormatInvalid,
    /// 账户不存在
    AccountNotExist,
    /// 其他未识别的错误码
    Other(i64),
}

impl IndexerErrorCode {
    pub fn from_errno(errno: i64) -> Self {
        match errno {
            10000 => Self::ParamsInvalid,
            10001 => Self::MethodNotExist,
            10002 => Self::DbError,
            20006 => Self::AccountFormatInvalid,
            20007 => Self::AccountNotExist,
            other => Self::Other(other),
        }
    }

    pub fn errno(&self) -> i64 {
        match self {
            Self::ParamsInvalid => 10000,
            Self::MethodNotExist => 10001,
            Self::DbError => 10002,
            Self::AccountFormatInvalid => 20006,
            Self::AccountNotExist => 20007,
            Self::Other(errno) => *errno,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DotbitError {
    /// 账户ID为空或为零值哨兵
    #[error("Please provide a valid account id, current: {0}")]
    InvalidAccountId(String),

    /// 索引器返回的业务错误
    #[error("indexer error {}: {message}", .code.errno())]
    Indexer {
        code: IndexerErrorCode,
        message: String,
    },

    /// 网络/传输层错误
    #[error("network error: {0}")]
    Network(String),

    /// 响应解析失败
    #[error("failed to decode indexer response: {0}")]
    Decode(String),

    /// 插件钩子失败，中止当前解析
    #[error("plugin '{plugin}' failed: {source}")]
    Plugin {
        plugin: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DotbitError {
    pub fn indexer(code: IndexerErrorCode, message: impl Into<String>) -> Self {
        Self::Indexer {
            code,
            message: message.into(),
        }
    }

    pub fn plugin(plugin: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            source,
        }
    }

    /// 索引器报告账户不存在
    pub fn is_account_not_exist(&self) -> bool {
        matches!(
            self,
            Self::Indexer {
                code: IndexerErrorCode::AccountNotExist,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for DotbitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DotbitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
