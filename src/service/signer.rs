//! 签名器接口（私钥永远不经过本库）

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait BitSigner: Send + Sync {
    /// 签名地址
    async fn address(&self) -> Result<String>;

    /// 对待签名数据签名，返回十六进制签名
    async fn sign_data(&self, data: &str, is_eip712: bool) -> Result<String>;
}
