//! das indexer JSON-RPC 客户端
//! 只设置请求超时，不做重试/降级（交给调用方）

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    config::IndexerConfig,
    domain::{AccountRole, KeyInfo},
    error::{DotbitError, IndexerErrorCode, Result},
    service::indexer::{AccountInfoResponse, BitIndexer, RawRecord, ReverseRecord, ServerInfo},
};

pub struct RemoteBitIndexer {
    url: String,
    http_client: reqwest::Client,
}

impl RemoteBitIndexer {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            http_client,
        })
    }

    pub fn from_config(config: &IndexerConfig) -> Result<Self> {
        Self::new(config.endpoint(), Duration::from_millis(config.timeout_ms))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        let req = JsonRpcRequest::new(method, params);
        tracing::debug!(method = %method, url = %self.url, "Sending indexer request");

        let resp = self.http_client.post(&self.url).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(method = %method, status = %status, "Indexer responded with error status");
            return Err(DotbitError::Network(format!(
                "indexer responded with HTTP {}",
                status
            )));
        }

        let body: JsonRpcResponse = resp.json().await?;
        decode_response(body)
    }
}

/// 解包 JSON-RPC 外壳与 indexer 的 errno/data 内层
fn decode_response<T: DeserializeOwned>(body: JsonRpcResponse) -> Result<T> {
    if let Some(err) = body.error {
        return Err(DotbitError::indexer(
            IndexerErrorCode::from_errno(err.code),
            err.message,
        ));
    }
    let result = body
        .result
        .ok_or_else(|| DotbitError::Decode("missing result in JSON-RPC response".into()))?;

    if result.errno != 0 {
        return Err(DotbitError::indexer(
            IndexerErrorCode::from_errno(result.errno),
            result.errmsg,
        ));
    }

    Ok(serde_json::from_value(result.data)?)
}

fn key_info_param(key_info: &KeyInfo) -> Value {
    json!({ "type": "blockchain", "key_info": key_info })
}

#[async_trait]
impl BitIndexer for RemoteBitIndexer {
    async fn server_info(&self) -> Result<ServerInfo> {
        self.request("das_serverInfo", vec![]).await
    }

    async fn reverse_record(&self, key_info: &KeyInfo) -> Result<ReverseRecord> {
        self.request("das_reverseRecord", vec![key_info_param(key_info)])
            .await
    }

    async fn account_list(&self, key_info: &KeyInfo, role: AccountRole) -> Result<Vec<String>> {
        let mut param = key_info_param(key_info);
        param["role"] = json!(role.as_str());

        let list: AccountList = self.request("das_accountList", vec![param]).await?;
        Ok(list
            .account_list
            .into_iter()
            .map(|item| item.account)
            .collect())
    }

    async fn account_info(&self, account: &str) -> Result<AccountInfoResponse> {
        self.request("das_accountInfo", vec![json!({ "account": account })])
            .await
    }

    async fn account_info_by_id(&self, account_id: &str) -> Result<AccountInfoResponse> {
        self.request("das_accountInfo", vec![json!({ "account_id": account_id })])
            .await
    }

    async fn account_records(&self, account: &str) -> Result<Vec<RawRecord>> {
        let records: AccountRecords = self
            .request("das_accountRecords", vec![json!({ "account": account })])
            .await?;
        Ok(records.records)
    }
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    method: &'a str,
    params: Vec<Value>,
    id: u64,
}

impl<'a> JsonRpcRequest<'a> {
    fn new(method: &'a str, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        }
    }
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<IndexerResult>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct IndexerResult {
    errno: i64,
    #[serde(default)]
    errmsg: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct AccountList {
    #[serde(default)]
    account_list: Vec<AccountListItem>,
}

#[derive(Deserialize)]
struct AccountListItem {
    account: String,
}

#[derive(Deserialize)]
struct AccountRecords {
    #[serde(default)]
    records: Vec<RawRecord>,
}
