//! 账户对象：普通账户与子账户
//!
//! 账户对象由门面在首次解析时构造（无 I/O），
//! 共享门面持有的索引器/交易构造器/签名器引用。

use std::{fmt, sync::Arc};

use crate::{
    domain::{
        chain_to_coin_type,
        records::{
            AccountRecord, AvatarInfo, DWebProtocol, RECORD_TYPE_ADDRESS, RECORD_TYPE_DWEB,
            RECORD_TYPE_PROFILE,
        },
    },
    error::Result,
    service::{
        indexer::{AccountInfoResponse, BitIndexer},
        signer::BitSigner,
        tx_builder::TxBuilder,
    },
    utils::account::{is_sub_account, parent_account},
};

/// 账户种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Normal,
    Sub,
}

/// 两种账户共用的字段与只读查询
#[derive(Clone)]
pub struct AccountCore {
    account: String,
    indexer: Arc<dyn BitIndexer>,
    builder: Option<Arc<dyn TxBuilder>>,
    signer: Option<Arc<dyn BitSigner>>,
}

impl AccountCore {
    pub fn new(
        account: impl Into<String>,
        indexer: Arc<dyn BitIndexer>,
        builder: Option<Arc<dyn TxBuilder>>,
        signer: Option<Arc<dyn BitSigner>>,
    ) -> Self {
        Self {
            account: account.into(),
            indexer,
            builder,
            signer,
        }
    }

    async fn info(&self) -> Result<AccountInfoResponse> {
        self.indexer.account_info(&self.account).await
    }

    async fn records(&self, key: Option<&str>) -> Result<Vec<AccountRecord>> {
        let records = self
            .indexer
            .account_records(&self.account)
            .await?
            .into_iter()
            .map(AccountRecord::from);

        Ok(match key {
            Some(key) => {
                let key = key.to_ascii_lowercase();
                records.filter(|r| r.key == key).collect()
            }
            None => records.collect(),
        })
    }

    async fn records_of_type(
        &self,
        record_type: &str,
        subtype: Option<&str>,
    ) -> Result<Vec<AccountRecord>> {
        let subtype = subtype.map(str::to_ascii_lowercase);
        Ok(self
            .records(None)
            .await?
            .into_iter()
            .filter(|r| r.is_type(record_type))
            .filter(|r| subtype.as_deref().map_or(true, |s| r.subtype == s))
            .collect())
    }

    async fn addrs(&self, chain: Option<&str>) -> Result<Vec<AccountRecord>> {
        let addresses = self.records_of_type(RECORD_TYPE_ADDRESS, None).await?;
        let Some(chain) = chain.map(str::to_ascii_lowercase) else {
            return Ok(addresses);
        };
        let coin_type = chain_to_coin_type(&chain);

        Ok(addresses
            .into_iter()
            .filter(|r| r.subtype == chain || Some(r.subtype.as_str()) == coin_type)
            .collect())
    }

    async fn dwebs(&self, protocol: Option<DWebProtocol>) -> Result<Vec<AccountRecord>> {
        self.records_of_type(RECORD_TYPE_DWEB, protocol.as_ref().map(DWebProtocol::as_str))
            .await
    }

    async fn dweb(&self) -> Result<Option<AccountRecord>> {
        let dwebs = self.dwebs(None).await?;
        Ok(DWebProtocol::PRIORITY.iter().find_map(|protocol| {
            dwebs
                .iter()
                .find(|r| r.subtype == protocol.as_str())
                .cloned()
        }))
    }

    async fn profiles(&self, key: Option<&str>) -> Result<Vec<AccountRecord>> {
        self.records_of_type(RECORD_TYPE_PROFILE, key).await
    }

    async fn avatar(&self) -> Result<Option<AvatarInfo>> {
        let profiles = self.profiles(None).await?;
        Ok(profiles
            .into_iter()
            .find(|r| r.is_avatar() && !r.value.is_empty())
            .map(|r| AvatarInfo { url: r.value }))
    }
}

/// 普通账户，例如 `parent.bit`
#[derive(Clone)]
pub struct NormalAccount {
    core: AccountCore,
}

impl NormalAccount {
    pub fn new(core: AccountCore) -> Self {
        Self { core }
    }

    pub fn account(&self) -> &str {
        &self.core.account
    }
}

/// 子账户，例如 `sub.parent.bit`
#[derive(Clone)]
pub struct SubAccount {
    core: AccountCore,
}

impl SubAccount {
    pub fn new(core: AccountCore) -> Self {
        Self { core }
    }

    pub fn account(&self) -> &str {
        &self.core.account
    }

    /// 所属父账户
    pub fn parent_account(&self) -> &str {
        parent_account(&self.core.account).unwrap_or(&self.core.account)
    }
}

/// 解析结果：构造时确定种类，之后不再重新分类
#[derive(Clone)]
pub enum BitAccount {
    Normal(NormalAccount),
    Sub(SubAccount),
}

impl BitAccount {
    /// 按账户语法选择变体并注入协作方
    pub fn from_identifier(
        account: &str,
        indexer: Arc<dyn BitIndexer>,
        builder: Option<Arc<dyn TxBuilder>>,
        signer: Option<Arc<dyn BitSigner>>,
    ) -> Self {
        let core = AccountCore::new(account, indexer, builder, signer);
        if is_sub_account(account) {
            Self::Sub(SubAccount::new(core))
        } else {
            Self::Normal(NormalAccount::new(core))
        }
    }

    fn core(&self) -> &AccountCore {
        match self {
            Self::Normal(normal) => &normal.core,
            Self::Sub(sub) => &sub.core,
        }
    }

    pub fn account(&self) -> &str {
        &self.core().account
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            Self::Normal(_) => AccountKind::Normal,
            Self::Sub(_) => AccountKind::Sub,
        }
    }

    pub fn is_sub_account(&self) -> bool {
        matches!(self, Self::Sub(_))
    }

    pub fn as_sub_account(&self) -> Option<&SubAccount> {
        match self {
            Self::Sub(sub) => Some(sub),
            Self::Normal(_) => None,
        }
    }

    pub fn indexer(&self) -> &Arc<dyn BitIndexer> {
        &self.core().indexer
    }

    pub fn builder(&self) -> Option<&Arc<dyn TxBuilder>> {
        self.core().builder.as_ref()
    }

    pub fn signer(&self) -> Option<&Arc<dyn BitSigner>> {
        self.core().signer.as_ref()
    }

    /// 账户信息
    pub async fn info(&self) -> Result<AccountInfoResponse> {
        self.core().info().await
    }

    /// 全部记录，传入 key 时只返回完整键名匹配的记录
    pub async fn records(&self, key: Option<&str>) -> Result<Vec<AccountRecord>> {
        self.core().records(key).await
    }

    /// 地址记录，chain 可以是链符号（eth）或币种编号（60）
    pub async fn addrs(&self, chain: Option<&str>) -> Result<Vec<AccountRecord>> {
        self.core().addrs(chain).await
    }

    pub async fn addresses(&self, chain: Option<&str>) -> Result<Vec<AccountRecord>> {
        self.addrs(chain).await
    }

    pub async fn dwebs(&self, protocol: Option<DWebProtocol>) -> Result<Vec<AccountRecord>> {
        self.core().dwebs(protocol).await
    }

    /// 按协议优先级取第一条 dweb 记录
    pub async fn dweb(&self) -> Result<Option<AccountRecord>> {
        self.core().dweb().await
    }

    pub async fn profiles(&self, key: Option<&str>) -> Result<Vec<AccountRecord>> {
        self.core().profiles(key).await
    }

    pub async fn avatar(&self) -> Result<Option<AvatarInfo>> {
        self.core().avatar().await
    }
}

impl fmt::Debug for BitAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitAccount")
            .field("account", &self.account())
            .field("kind", &self.kind())
            .field("has_builder", &self.builder().is_some())
            .field("has_signer", &self.signer().is_some())
            .finish()
    }
}
