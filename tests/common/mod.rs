//! 测试辅助模块
//! 提供内存 indexer 和记录钩子调用的插件

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use dotbit::{
    domain::{AccountRole, BitAccount, KeyInfo},
    error::{DotbitError, IndexerErrorCode, Result},
    service::{
        indexer::{AccountInfo, AccountInfoResponse, BitIndexer, RawRecord, ReverseRecord, ServerInfo},
        BitPlugin,
    },
    DotBit,
};

/// 内存 indexer，统计调用次数
#[derive(Default)]
pub struct MockIndexer {
    registered: HashMap<String, String>,
    records: HashMap<String, Vec<RawRecord>>,
    reverse: HashMap<String, String>,
    owned: HashMap<String, Vec<String>>,
    managed: HashMap<String, Vec<String>>,
    /// 这些账户查询时模拟网络故障
    unreachable: Vec<String>,
    calls: AtomicUsize,
}

impl MockIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: &str, account_id: &str) -> Self {
        self.registered
            .insert(account.to_string(), account_id.to_string());
        self
    }

    pub fn with_records(mut self, account: &str, records: &[(&str, &str)]) -> Self {
        let records = records
            .iter()
            .map(|(key, value)| RawRecord {
                key: key.to_string(),
                label: String::new(),
                value: value.to_string(),
                ttl: "300".into(),
            })
            .collect();
        self.records.insert(account.to_string(), records);
        self
    }

    pub fn with_reverse(mut self, key: &str, account: &str) -> Self {
        self.reverse.insert(key.to_string(), account.to_string());
        self
    }

    pub fn with_owned(mut self, key: &str, accounts: &[&str]) -> Self {
        self.owned.insert(
            key.to_string(),
            accounts.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn with_managed(mut self, key: &str, accounts: &[&str]) -> Self {
        self.managed.insert(
            key.to_string(),
            accounts.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn with_unreachable(mut self, account: &str) -> Self {
        self.unreachable.push(account.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn info_for(&self, account: &str) -> Result<AccountInfoResponse> {
        if self.unreachable.iter().any(|a| a == account) {
            return Err(DotbitError::Network("connection reset by peer".into()));
        }
        match self.registered.get(account) {
            Some(account_id) => Ok(AccountInfoResponse {
                out_point: None,
                account_info: AccountInfo {
                    account: account.to_string(),
                    account_id_hex: account_id.clone(),
                    ..Default::default()
                },
            }),
            None => Err(DotbitError::indexer(
                IndexerErrorCode::AccountNotExist,
                "account not exist",
            )),
        }
    }
}

#[async_trait]
impl BitIndexer for MockIndexer {
    async fn server_info(&self) -> Result<ServerInfo> {
        self.hit();
        Ok(ServerInfo {
            is_latest_block_number: true,
            current_block_number: 42,
        })
    }

    async fn reverse_record(&self, key_info: &KeyInfo) -> Result<ReverseRecord> {
        self.hit();
        Ok(ReverseRecord {
            account: Some(self.reverse.get(&key_info.key).cloned().unwrap_or_default()),
            account_alias: None,
        })
    }

    async fn account_list(&self, key_info: &KeyInfo, role: AccountRole) -> Result<Vec<String>> {
        self.hit();
        let source = match role {
            AccountRole::Owner => &self.owned,
            AccountRole::Manager => &self.managed,
        };
        Ok(source.get(&key_info.key).cloned().unwrap_or_default())
    }

    async fn account_info(&self, account: &str) -> Result<AccountInfoResponse> {
        self.hit();
        self.info_for(account)
    }

    async fn account_info_by_id(&self, account_id: &str) -> Result<AccountInfoResponse> {
        self.hit();
        let account = self
            .registered
            .iter()
            .find(|(_, id)| id.as_str() == account_id)
            .map(|(account, _)| account.clone())
            .ok_or_else(|| {
                DotbitError::indexer(IndexerErrorCode::AccountNotExist, "account not exist")
            })?;
        self.info_for(&account)
    }

    async fn account_records(&self, account: &str) -> Result<Vec<RawRecord>> {
        self.hit();
        Ok(self.records.get(account).cloned().unwrap_or_default())
    }
}

/// 共享的钩子调用日志
pub type HookLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> HookLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &HookLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// 把每次钩子调用记录为 `<name>:<hook>[:<account>]`
pub struct RecordingPlugin {
    name: String,
    log: HookLog,
    supports_install: bool,
    fail_install: bool,
    fail_on: Option<String>,
}

impl RecordingPlugin {
    pub fn new(name: &str, log: &HookLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            supports_install: true,
            fail_install: false,
            fail_on: None,
        }
    }

    /// 不提供 on_install 能力
    pub fn without_install(mut self) -> Self {
        self.supports_install = false;
        self
    }

    pub fn failing_install(mut self) -> Self {
        self.fail_install = true;
        self
    }

    /// 初始化指定账户时返回错误
    pub fn failing_on(mut self, account: &str) -> Self {
        self.fail_on = Some(account.to_string());
        self
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl BitPlugin for RecordingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_install(&self, _dotbit: &DotBit) -> Option<anyhow::Result<()>> {
        if !self.supports_install {
            return None;
        }
        self.record(format!("{}:install", self.name));
        if self.fail_install {
            return Some(Err(anyhow::anyhow!("install rejected")));
        }
        Some(Ok(()))
    }

    fn on_uninstall(&self, _dotbit: &DotBit) -> anyhow::Result<()> {
        self.record(format!("{}:uninstall", self.name));
        Ok(())
    }

    fn on_init_account(&self, account: &BitAccount) -> anyhow::Result<()> {
        self.record(format!("{}:init:{}", self.name, account.account()));
        if self.fail_on.as_deref() == Some(account.account()) {
            anyhow::bail!("refusing to initialise {}", account.account());
        }
        Ok(())
    }
}
