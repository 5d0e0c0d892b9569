//! 账户解析记录（`address.60`、`profile.twitter`、`dweb.ipfs` 等）

use serde::{Deserialize, Serialize};

use crate::service::indexer::RawRecord;

pub const RECORD_TYPE_ADDRESS: &str = "address";
pub const RECORD_TYPE_PROFILE: &str = "profile";
pub const RECORD_TYPE_DWEB: &str = "dweb";

const AVATAR_SUBTYPE: &str = "avatar";

/// 拆分后的账户记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// 完整键名，例如 `address.60`
    pub key: String,
    /// 键名第一段，例如 `address`
    pub record_type: String,
    /// 键名剩余部分，例如 `60`
    pub subtype: String,
    pub label: String,
    pub value: String,
    pub ttl: String,
}

impl From<RawRecord> for AccountRecord {
    fn from(raw: RawRecord) -> Self {
        let key = raw.key.to_ascii_lowercase();
        let (record_type, subtype) = match key.split_once('.') {
            Some((record_type, subtype)) => (record_type.to_string(), subtype.to_string()),
            None => (key.clone(), String::new()),
        };
        Self {
            key,
            record_type,
            subtype,
            label: raw.label,
            value: raw.value,
            ttl: raw.ttl,
        }
    }
}

impl AccountRecord {
    pub fn is_type(&self, record_type: &str) -> bool {
        self.record_type == record_type
    }

    pub fn is_avatar(&self) -> bool {
        self.is_type(RECORD_TYPE_PROFILE) && self.subtype == AVATAR_SUBTYPE
    }
}

/// 去中心化网站协议，声明顺序即 `dweb()` 的优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DWebProtocol {
    Ipns,
    Ipfs,
    Arweave,
    Resilio,
    Skynet,
}

impl DWebProtocol {
    pub const PRIORITY: [DWebProtocol; 5] = [
        DWebProtocol::Ipns,
        DWebProtocol::Ipfs,
        DWebProtocol::Arweave,
        DWebProtocol::Resilio,
        DWebProtocol::Skynet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ipns => "ipns",
            Self::Ipfs => "ipfs",
            Self::Arweave => "arweave",
            Self::Resilio => "resilio",
            Self::Skynet => "skynet",
        }
    }
}

/// 头像信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarInfo {
    pub url: String,
}
