//! dotbit - .bit 账户解析库
//!
//! 通过远程 indexer 把 `.bit` 账户名解析为带类型的账户对象，支持插件钩子和可选缓存

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod service;
pub mod utils;

// 重新导出常用类型
pub use error::{DotbitError, IndexerErrorCode, Result};
pub use service::{create_instance, DotBit};

pub mod prelude {
    pub use crate::{
        config::{BitNetwork, Config},
        domain::{AccountKind, AccountRole, BitAccount, KeyInfo},
        error::{DotbitError, IndexerErrorCode, Result},
        infrastructure::{CacheProvider, InMemoryCacheProvider},
        service::{BitIndexer, BitPlugin, DotBit},
    };
}
