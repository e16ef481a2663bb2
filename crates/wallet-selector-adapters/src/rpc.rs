use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde_json::Value;

use wallet_selector_core::{Broadcaster, PortError, SignedTransaction, TransactionOutcome};

use crate::AdapterConfig;

/// JSON-RPC broadcaster speaking `broadcast_tx_commit` to a NEAR node.
#[derive(Debug, Clone)]
pub struct RpcBroadcaster {
    node_url: String,
    client: reqwest::Client,
}

impl RpcBroadcaster {
    pub fn new(node_url: impl Into<String>, timeout: Duration) -> Result<Self, PortError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Transport(format!("failed to build rpc client: {e}")))?;
        Ok(Self {
            node_url: node_url.into(),
            client,
        })
    }

    pub fn with_config(config: &AdapterConfig) -> Result<Self, PortError> {
        Self::new(
            config.network.node_url.clone(),
            Duration::from_millis(config.rpc_timeout_ms),
        )
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": method,
            "params": params,
        });
        let response = self
            .client
            .post(&self.node_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("rpc request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PortError::Transport(format!("rpc status {status}: {text}")));
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("rpc json decode failed: {e}")))?;
        if let Some(err) = body.get("error") {
            return Err(PortError::Rejected(format!("rpc returned error: {err}")));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Validation("rpc response missing result".to_owned()))
    }
}

#[async_trait]
impl Broadcaster for RpcBroadcaster {
    async fn send_transaction(
        &self,
        signed: &SignedTransaction,
    ) -> Result<TransactionOutcome, PortError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(signed.as_bytes());
        tracing::debug!(node_url = %self.node_url, bytes = signed.as_bytes().len(), "broadcast_tx_commit");
        let outcome = self
            .rpc_call("broadcast_tx_commit", serde_json::json!([encoded]))
            .await?;
        if let Some(failure) = outcome.get("status").and_then(|s| s.get("Failure")) {
            return Err(PortError::Rejected(format!("transaction failed: {failure}")));
        }
        Ok(outcome)
    }
}
