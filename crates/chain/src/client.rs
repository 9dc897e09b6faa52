//! EVM JSON-RPC client (spec.md §2 item 2, §6 "Chain RPC").
//!
//! Grounded on
//! `original_source/producer/internal/blockchain/blockchain_processor.go`:
//! one HTTP client for request/response calls, one WS client for the
//! head subscription, both authenticated with HTTP Basic (empty
//! username, API key as password) via the `Authorization` header.

use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256};
use futures::{Stream, StreamExt};
use jsonrpsee::core::client::{ClientT, Subscription, SubscriptionClientT};
use jsonrpsee::http_client::{HeaderMap, HeaderValue, HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};

use crate::rpc_types::{RpcBlock, RpcHead, RpcReceipt, RpcTraceEntry};

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("failed to dial chain RPC endpoint {url}: {source}")]
    Dial {
        url: String,
        #[source]
        source: jsonrpsee::core::ClientError,
    },
    #[error("chain RPC call {method} failed: {source}")]
    Call {
        method: &'static str,
        #[source]
        source: jsonrpsee::core::ClientError,
    },
    #[error("chain RPC subscription failed: {0}")]
    Subscription(#[source] jsonrpsee::core::ClientError),
    #[error("block {0} not found")]
    BlockNotFound(String),
}

/// `Authorization: Basic base64(":" + api_key)`, mirroring the Go
/// source's `basicAuth("", apiKey)`.
fn basic_auth_header(api_key: Option<&str>) -> Option<HeaderValue> {
    let api_key = api_key?;
    let credentials = format!(":{api_key}");
    let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, credentials);
    HeaderValue::from_str(&format!("Basic {encoded}")).ok()
}

pub struct ChainClient {
    http: HttpClient,
    ws: WsClient,
    trace_enabled: bool,
}

impl ChainClient {
    pub async fn connect(
        http_url: &str,
        ws_url: &str,
        api_key: Option<&str>,
        trace_enabled: bool,
    ) -> Result<Self, ChainError> {
        let mut headers = HeaderMap::new();
        if let Some(value) = basic_auth_header(api_key) {
            headers.insert(http::header::AUTHORIZATION, value);
        }

        let http = HttpClientBuilder::default()
            .set_headers(headers.clone())
            .request_timeout(Duration::from_secs(30))
            .build(http_url)
            .map_err(|source| ChainError::Dial { url: http_url.to_string(), source })?;

        let ws = WsClientBuilder::default()
            .set_headers(headers)
            .request_timeout(Duration::from_secs(30))
            .build(ws_url)
            .await
            .map_err(|source| ChainError::Dial { url: ws_url.to_string(), source })?;

        Ok(Self { http, ws, trace_enabled })
    }

    pub fn trace_enabled(&self) -> bool {
        self.trace_enabled
    }

    pub async fn block_number(&self) -> Result<u64, ChainError> {
        let raw: String = self
            .http
            .request("eth_blockNumber", rpc_params![])
            .await
            .map_err(|source| ChainError::Call { method: "eth_blockNumber", source })?;
        let trimmed = raw.strip_prefix("0x").unwrap_or(&raw);
        u64::from_str_radix(trimmed, 16)
            .map_err(|_| ChainError::BlockNotFound(raw))
    }

    pub async fn block_by_number(&self, number: u64) -> Result<RpcBlock, ChainError> {
        let tag = format!("0x{number:x}");
        self.http
            .request("eth_getBlockByNumber", rpc_params![tag, true])
            .await
            .map_err(|source| ChainError::Call { method: "eth_getBlockByNumber", source })
    }

    pub async fn block_by_hash(&self, hash: B256) -> Result<RpcBlock, ChainError> {
        self.http
            .request("eth_getBlockByHash", rpc_params![hash, true])
            .await
            .map_err(|source| ChainError::Call { method: "eth_getBlockByHash", source })
    }

    pub async fn transaction_receipt(&self, hash: B256) -> Result<RpcReceipt, ChainError> {
        self.http
            .request("eth_getTransactionReceipt", rpc_params![hash])
            .await
            .map_err(|source| ChainError::Call { method: "eth_getTransactionReceipt", source })
    }

    pub async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        self.http
            .request("eth_getCode", rpc_params![address, "latest"])
            .await
            .map_err(|source| ChainError::Call { method: "eth_getCode", source })
    }

    /// Raw `eth_call`, used by `idx-abi` for token metadata reads.
    pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let call_object = serde_json::json!({ "to": to, "data": data });
        self.http
            .request("eth_call", rpc_params![call_object, "latest"])
            .await
            .map_err(|source| ChainError::Call { method: "eth_call", source })
    }

    pub async fn trace_transaction(&self, hash: B256) -> Result<Vec<RpcTraceEntry>, ChainError> {
        self.http
            .request("trace_transaction", rpc_params![hash])
            .await
            .map_err(|source| ChainError::Call { method: "trace_transaction", source })
    }

    /// Subscribes to `newHeads`; yields each announced head in order.
    pub async fn subscribe_new_heads(
        &self,
    ) -> Result<impl Stream<Item = Result<RpcHead, ChainError>> + '_, ChainError> {
        let subscription: Subscription<RpcHead> = self
            .ws
            .subscribe("eth_subscribe", rpc_params!["newHeads"], "eth_unsubscribe")
            .await
            .map_err(ChainError::Subscription)?;

        Ok(subscription.map(|item| item.map_err(|e| ChainError::Subscription(e.into()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_is_base64_of_colon_prefixed_key() {
        let header = basic_auth_header(Some("secret")).unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic OnNlY3JldA==");
    }

    #[test]
    fn basic_auth_header_absent_without_api_key() {
        assert!(basic_auth_header(None).is_none());
    }
}
