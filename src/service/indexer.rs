//! 索引器协作方接口
//! 核心层只依赖该 trait，具体网络实现见 `infrastructure::indexer_client`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{AccountRole, KeyInfo},
    error::Result,
};

// ============ 响应模型 ============

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub is_latest_block_number: bool,
    #[serde(default)]
    pub current_block_number: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseRecord {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub account_alias: Option<String>,
}

impl ReverseRecord {
    /// 已绑定的账户；索引器用空字符串表示未绑定
    pub fn bound_account(&self) -> Option<&str> {
        self.account.as_deref().filter(|account| !account.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutPoint {
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub index: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountInfo {
    pub account: String,
    pub account_alias: String,
    pub account_id_hex: String,
    pub next_account_id_hex: String,
    pub create_at_unix: u64,
    pub expired_at_unix: u64,
    pub status: i32,
    pub das_lock_arg_hex: String,
    pub owner_algorithm_id: i32,
    pub owner_key: String,
    pub manager_algorithm_id: i32,
    pub manager_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfoResponse {
    #[serde(default)]
    pub out_point: Option<OutPoint>,
    pub account_info: AccountInfo,
}

/// 索引器返回的原始记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub key: String,
    pub label: String,
    pub value: String,
    pub ttl: String,
}

// ============ Indexer Trait ============

#[async_trait]
pub trait BitIndexer: Send + Sync {
    /// 索引器状态
    async fn server_info(&self) -> Result<ServerInfo>;

    /// 地址反向解析
    async fn reverse_record(&self, key_info: &KeyInfo) -> Result<ReverseRecord>;

    /// 按角色列出地址持有/管理的账户
    async fn account_list(&self, key_info: &KeyInfo, role: AccountRole) -> Result<Vec<String>>;

    /// 按账户名查询账户信息，账户不存在时返回 `IndexerErrorCode::AccountNotExist`
    async fn account_info(&self, account: &str) -> Result<AccountInfoResponse>;

    /// 按账户ID查询账户信息
    async fn account_info_by_id(&self, account_id: &str) -> Result<AccountInfoResponse>;

    /// 账户全部解析记录
    async fn account_records(&self, account: &str) -> Result<Vec<RawRecord>>;
}
