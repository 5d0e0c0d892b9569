//! 远程交易构造器接口
//! 只注入到账户对象中，核心层从不调用

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait TxBuilder: Send + Sync {
    /// 构造器服务地址
    fn endpoint(&self) -> &str;

    /// 提交构造请求，返回待签名交易
    async fn build(&self, action: &str, params: serde_json::Value) -> Result<serde_json::Value>;
}
