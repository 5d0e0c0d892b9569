//! .bit 账户解析门面
//!
//! 所有需要账户对象的操作都走同一条解析路径：
//! 查缓存 -> 按语法分类构造 -> 分发插件钩子 -> 回写缓存。
//! 解析本身是同步的，只有账户上的查询是异步的。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use once_cell::sync::OnceCell;

use crate::{
    config::BitNetwork,
    domain::{AccountRecord, AccountRole, AvatarInfo, BitAccount, DWebProtocol, KeyInfo},
    error::{DotbitError, Result},
    infrastructure::cache::CacheProvider,
    service::{
        indexer::{AccountInfoResponse, BitIndexer, ServerInfo},
        plugin::{BitPlugin, PluginRegistry},
        signer::BitSigner,
        tx_builder::TxBuilder,
    },
    utils::{account_cache_key, is_empty_address},
};

type InflightSlot = Arc<OnceCell<Arc<BitAccount>>>;

pub struct DotBit {
    network: BitNetwork,
    indexer: Arc<dyn BitIndexer>,
    builder: Option<Arc<dyn TxBuilder>>,
    signer: Option<Arc<dyn BitSigner>>,
    cache_provider: Option<Arc<dyn CacheProvider>>,
    plugins: PluginRegistry,
    /// 正在首次构造的账户，保证同一账户并发解析时只构造一次
    inflight: Mutex<HashMap<String, InflightSlot>>,
}

impl DotBit {
    pub fn new(indexer: Arc<dyn BitIndexer>) -> Self {
        Self {
            network: BitNetwork::default(),
            indexer,
            builder: None,
            signer: None,
            cache_provider: None,
            plugins: PluginRegistry::new(),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_network(mut self, network: BitNetwork) -> Self {
        self.network = network;
        self
    }

    pub fn with_cache_provider(mut self, cache_provider: Arc<dyn CacheProvider>) -> Self {
        self.cache_provider = Some(cache_provider);
        self
    }

    pub fn with_builder(mut self, builder: Arc<dyn TxBuilder>) -> Self {
        self.builder = Some(builder);
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn BitSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn network(&self) -> BitNetwork {
        self.network
    }

    pub fn indexer(&self) -> &Arc<dyn BitIndexer> {
        &self.indexer
    }

    pub fn cache_provider(&self) -> Option<&Arc<dyn CacheProvider>> {
        self.cache_provider.as_ref()
    }

    /// 已注册插件名称（按注册顺序）
    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins.names()
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    // ============ 插件生命周期 ============

    /// 安装插件：先同步调用 on_install，成功后追加到注册表末尾。
    /// 插件未提供 on_install 时只记录警告，不注册也不报错。
    pub fn install_plugin(&self, plugin: Arc<dyn BitPlugin>) -> Result<()> {
        match plugin.on_install(self) {
            None => {
                tracing::warn!(
                    plugin = %plugin.name(),
                    "Plugin '{}' does not have 'on_install' method, please check your plugin",
                    plugin.name()
                );
                Ok(())
            }
            Some(Err(e)) => Err(DotbitError::plugin(plugin.name(), e)),
            Some(Ok(())) => {
                tracing::debug!(plugin = %plugin.name(), "Plugin installed");
                self.plugins.push(plugin);
                Ok(())
            }
        }
    }

    /// 卸载插件：按引用身份移除后调用 on_uninstall。
    /// 插件未注册时不做任何修改，返回 false。
    pub fn uninstall_plugin(&self, plugin: &Arc<dyn BitPlugin>) -> Result<bool> {
        if !self.plugins.remove(plugin) {
            tracing::warn!(plugin = %plugin.name(), "Attempted to uninstall a plugin that is not installed");
            return Ok(false);
        }

        plugin
            .on_uninstall(self)
            .map_err(|e| DotbitError::plugin(plugin.name(), e))?;
        tracing::debug!(plugin = %plugin.name(), "Plugin uninstalled");
        Ok(true)
    }

    // ============ 账户解析 ============

    fn cached(&self, cache_key: &str) -> Option<Arc<BitAccount>> {
        let cached = self.cache_provider.as_ref()?.get(cache_key);
        if cached.is_some() {
            tracing::trace!(cache_key = %cache_key, "Account cache hit");
        }
        cached
    }

    fn get_account(&self, account: &str) -> Result<Arc<BitAccount>> {
        let cache_key = account_cache_key(account);
        // 缓存命中直接信任，不重新分类
        if let Some(cached) = self.cached(&cache_key) {
            return Ok(cached);
        }

        let slot = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            inflight
                .entry(account.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let resolved = slot
            .get_or_try_init(|| self.create_account(account, &cache_key))
            .map(Arc::clone);

        // 构造失败时保留槽位，后来者加入同一个 OnceCell 重试
        if resolved.is_ok() {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            if inflight
                .get(account)
                .is_some_and(|current| Arc::ptr_eq(current, &slot))
            {
                inflight.remove(account);
            }
        }

        resolved
    }

    fn create_account(&self, account: &str, cache_key: &str) -> Result<Arc<BitAccount>> {
        // 上一轮构造可能在本次查缓存之后才写回
        if let Some(cached) = self.cached(cache_key) {
            return Ok(cached);
        }

        let bit_account = Arc::new(BitAccount::from_identifier(
            account,
            self.indexer.clone(),
            self.builder.clone(),
            self.signer.clone(),
        ));
        tracing::debug!(account = %account, kind = ?bit_account.kind(), "Account object constructed");

        self.plugins.dispatch_init_account(&bit_account)?;

        if let Some(cache_provider) = &self.cache_provider {
            cache_provider.set(cache_key, bit_account.clone());
        }

        Ok(bit_account)
    }

    /// 获取账户对象，首次访问时构造并注册
    pub fn account(&self, account: &str) -> Result<Arc<BitAccount>> {
        self.get_account(account)
    }

    // ============ 查询 ============

    pub async fn server_info(&self) -> Result<ServerInfo> {
        self.indexer.server_info().await
    }

    /// 反向解析；地址未绑定账户时返回 Ok(None)
    pub async fn reverse(&self, key_info: &KeyInfo) -> Result<Option<Arc<BitAccount>>> {
        let record = self.indexer.reverse_record(key_info).await?;
        match record.bound_account() {
            Some(account) => self.get_account(account).map(Some),
            None => Ok(None),
        }
    }

    pub async fn alias(&self, key_info: &KeyInfo) -> Result<Option<Arc<BitAccount>>> {
        self.reverse(key_info).await
    }

    pub async fn accounts_of_owner(&self, key_info: &KeyInfo) -> Result<Vec<Arc<BitAccount>>> {
        self.accounts_of_role(key_info, AccountRole::Owner).await
    }

    pub async fn accounts_of_manager(&self, key_info: &KeyInfo) -> Result<Vec<Arc<BitAccount>>> {
        self.accounts_of_role(key_info, AccountRole::Manager).await
    }

    /// 与索引器返回顺序一致
    async fn accounts_of_role(
        &self,
        key_info: &KeyInfo,
        role: AccountRole,
    ) -> Result<Vec<Arc<BitAccount>>> {
        let accounts = self.indexer.account_list(key_info, role).await?;
        accounts
            .iter()
            .map(|account| self.get_account(account))
            .collect()
    }

    /// 账户是否存在：仅“账户不存在”映射为 false，其余错误原样返回
    pub async fn exist(&self, account: &str) -> Result<bool> {
        let bit_account = self.get_account(account)?;
        match bit_account.info().await {
            Ok(_) => Ok(true),
            Err(e) if e.is_account_not_exist() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// 按账户ID获取账户；空/零值ID在发起任何请求前拒绝
    pub async fn account_by_id(&self, account_id: &str) -> Result<Arc<BitAccount>> {
        let account_id = account_id.trim();
        if is_empty_address(account_id) {
            return Err(DotbitError::InvalidAccountId(account_id.to_string()));
        }
        let info = self.indexer.account_info_by_id(account_id).await?;
        self.get_account(&info.account_info.account)
    }

    pub async fn records(&self, account: &str, key: Option<&str>) -> Result<Vec<AccountRecord>> {
        self.get_account(account)?.records(key).await
    }

    pub async fn account_info(&self, account: &str) -> Result<AccountInfoResponse> {
        self.get_account(account)?.info().await
    }

    pub async fn addrs(&self, account: &str, chain: Option<&str>) -> Result<Vec<AccountRecord>> {
        self.get_account(account)?.addrs(chain).await
    }

    pub async fn addresses(
        &self,
        account: &str,
        chain: Option<&str>,
    ) -> Result<Vec<AccountRecord>> {
        self.addrs(account, chain).await
    }

    pub async fn dwebs(
        &self,
        account: &str,
        protocol: Option<DWebProtocol>,
    ) -> Result<Vec<AccountRecord>> {
        self.get_account(account)?.dwebs(protocol).await
    }

    pub async fn dweb(&self, account: &str) -> Result<Option<AccountRecord>> {
        self.get_account(account)?.dweb().await
    }

    pub async fn profiles(&self, account: &str, key: Option<&str>) -> Result<Vec<AccountRecord>> {
        self.get_account(account)?.profiles(key).await
    }

    pub async fn avatar(&self, account: &str) -> Result<Option<AvatarInfo>> {
        self.get_account(account)?.avatar().await
    }
}
