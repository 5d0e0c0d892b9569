//! 反向解析/持有关系查询使用的地址标识

use serde::{Deserialize, Serialize};

/// 地址 + 币种/链标识，核心层只透传不解析
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyInfo {
    pub coin_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    pub key: String,
}

impl KeyInfo {
    pub fn new(coin_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            coin_type: coin_type.into(),
            chain_id: None,
            key: key.into(),
        }
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }
}

/// 账户列表查询角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Owner,
    Manager,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
        }
    }
}

/// SLIP-44 币种编号
pub mod coin_type {
    pub const BTC: &str = "0";
    pub const DOGE: &str = "3";
    pub const ETH: &str = "60";
    pub const TRX: &str = "195";
    pub const CKB: &str = "309";
    pub const MATIC: &str = "966";
    pub const BSC: &str = "9006";
}

/// 链符号 -> 币种编号（大小写不敏感）
pub fn chain_to_coin_type(chain: &str) -> Option<&'static str> {
    match chain.to_ascii_lowercase().as_str() {
        "btc" | "bitcoin" => Some(coin_type::BTC),
        "doge" | "dogecoin" => Some(coin_type::DOGE),
        "eth" | "ethereum" => Some(coin_type::ETH),
        "trx" | "tron" => Some(coin_type::TRX),
        "ckb" | "nervos" => Some(coin_type::CKB),
        "matic" | "polygon" => Some(coin_type::MATIC),
        "bsc" | "bnb" => Some(coin_type::BSC),
        _ => None,
    }
}
