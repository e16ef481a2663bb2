#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use wallet_selector_adapters::{
    AdapterConfig, MathProvider, SenderProvider, SenderSignInRequest, SenderSignInResponse,
    SenderTransactionRequest, SenderTransactionResponse, SharedHostState,
};
use wallet_selector_core::{
    Action, Broadcaster, ContractState, EventSink, NetworkConfig, PartialTransaction, PortError,
    ProviderEvent, ProviderEventKind, SignedTransaction, Transaction, TransactionOutcome,
    TransactionSigner, WalletEnvironment,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn fast_config() -> AdapterConfig {
    AdapterConfig {
        probe_timeout_ms: 100,
        probe_interval_ms: 10,
        contract: Some(ContractState::new("app.near")),
        ..AdapterConfig::default()
    }
}

pub fn environment(host: &SharedHostState, broadcaster: Arc<RecordingBroadcaster>) -> WalletEnvironment {
    WalletEnvironment {
        contract: None,
        host: Arc::new(host.clone()),
        broadcaster,
    }
}

pub fn add_message(text: &str) -> Action {
    Action::function_call("addMessage", json!({ "text": text }), "30000000000000", "0")
}

pub fn call_on(receiver: &str) -> PartialTransaction {
    PartialTransaction::new(vec![add_message(receiver)]).with_receiver(receiver)
}

#[derive(Debug)]
pub struct SenderState {
    pub account_id: Option<String>,
    pub account_after_sign_in: Option<String>,
    pub sign_in_response: SenderSignInResponse,
    pub sign_out_result: bool,
    pub fail_send_at: Option<usize>,
    pub empty_response_at: Option<usize>,
    pub sign_in_requests: Vec<SenderSignInRequest>,
    pub requests: Vec<SenderTransactionRequest>,
    pub sinks: Vec<(ProviderEventKind, EventSink)>,
}

impl Default for SenderState {
    fn default() -> Self {
        Self {
            account_id: None,
            account_after_sign_in: Some("alice.near".to_owned()),
            sign_in_response: SenderSignInResponse {
                access_key: Some(json!({ "publicKey": "ed25519:abc", "secretKey": "ed25519:def" })),
                error: None,
            },
            sign_out_result: true,
            fail_send_at: None,
            empty_response_at: None,
            sign_in_requests: Vec::new(),
            requests: Vec::new(),
            sinks: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockSenderProvider {
    pub state: Mutex<SenderState>,
    pub sign_in_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
}

impl MockSenderProvider {
    pub fn signed_in(account_id: &str) -> Self {
        let provider = Self::default();
        provider.state.lock().expect("sender state").account_id = Some(account_id.to_owned());
        provider
    }

    pub fn with<F: FnOnce(&mut SenderState)>(self, f: F) -> Self {
        f(&mut self.state.lock().expect("sender state"));
        self
    }

    pub fn with_state<F: FnOnce(&mut SenderState)>(&self, f: F) {
        f(&mut self.state.lock().expect("sender state"));
    }

    pub fn set_account(&self, account_id: Option<&str>) {
        self.state.lock().expect("sender state").account_id = account_id.map(str::to_owned);
    }

    /// Simulates the extension firing one of its callbacks.
    pub fn fire(&self, event: ProviderEvent) {
        let g = self.state.lock().expect("sender state");
        for (kind, sink) in &g.sinks {
            if *kind == event.kind() {
                let _ = sink.send(event.clone());
            }
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.state.lock().expect("sender state").sinks.len()
    }

    pub fn signed_in_contracts(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("sender state")
            .sign_in_requests
            .iter()
            .map(|r| r.contract_id.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<SenderTransactionRequest> {
        self.state.lock().expect("sender state").requests.clone()
    }
}

#[async_trait]
impl SenderProvider for MockSenderProvider {
    fn is_sender(&self) -> bool {
        true
    }

    fn get_account_id(&self) -> Option<String> {
        self.state.lock().expect("sender state").account_id.clone()
    }

    fn is_signed_in(&self) -> bool {
        self.get_account_id().is_some()
    }

    async fn request_sign_in(
        &self,
        request: SenderSignInRequest,
    ) -> Result<SenderSignInResponse, PortError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        let mut g = self.state.lock().expect("sender state");
        g.sign_in_requests.push(request);
        let response = g.sign_in_response.clone();
        if response.access_key.is_some() {
            g.account_id = g.account_after_sign_in.clone();
        }
        Ok(response)
    }

    async fn sign_out(&self) -> Result<bool, PortError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        let mut g = self.state.lock().expect("sender state");
        if g.sign_out_result {
            g.account_id = None;
        }
        Ok(g.sign_out_result)
    }

    async fn sign_and_send_transaction(
        &self,
        request: SenderTransactionRequest,
    ) -> Result<SenderTransactionResponse, PortError> {
        let index = self.send_calls.fetch_add(1, Ordering::SeqCst);
        let mut g = self.state.lock().expect("sender state");
        g.requests.push(request.clone());
        if g.fail_send_at == Some(index) {
            return Ok(SenderTransactionResponse {
                response: None,
                error: Some(json!("User rejected the transaction")),
            });
        }
        if g.empty_response_at == Some(index) {
            return Ok(SenderTransactionResponse {
                response: Some(Vec::new()),
                error: None,
            });
        }
        Ok(SenderTransactionResponse {
            response: Some(vec![json!({ "receiverId": request.receiver_id })]),
            error: None,
        })
    }

    fn on(&self, kind: ProviderEventKind, sink: EventSink) -> Result<(), PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("sender state poisoned: {e}")))?
            .sinks
            .push((kind, sink));
        Ok(())
    }
}

#[derive(Debug)]
pub struct MathState {
    pub account: Option<Value>,
    pub account_after_login: Option<Value>,
    pub login_result: Option<Value>,
    pub logout_result: bool,
    pub fail_sign_at: Option<usize>,
    pub signed: Vec<Transaction>,
}

impl Default for MathState {
    fn default() -> Self {
        Self {
            account: None,
            account_after_login: Some(json!({ "accountId": "alice.near", "publicKey": "ed25519:abc" })),
            login_result: Some(json!({ "accountId": "alice.near" })),
            logout_result: true,
            fail_sign_at: None,
            signed: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockMathProvider {
    pub state: Mutex<MathState>,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub sign_calls: AtomicUsize,
}

impl MockMathProvider {
    pub fn with<F: FnOnce(&mut MathState)>(self, f: F) -> Self {
        f(&mut self.state.lock().expect("math state"));
        self
    }

    pub fn signed_in(account_id: &str) -> Self {
        Self::default().with(|s| s.account = Some(json!({ "accountId": account_id })))
    }

    pub fn signed(&self) -> Vec<Transaction> {
        self.state.lock().expect("math state").signed.clone()
    }
}

#[async_trait]
impl TransactionSigner for MockMathProvider {
    async fn sign_transaction(
        &self,
        tx: &Transaction,
        _network: &NetworkConfig,
    ) -> Result<SignedTransaction, PortError> {
        let index = self.sign_calls.fetch_add(1, Ordering::SeqCst);
        let mut g = self.state.lock().expect("math state");
        if g.fail_sign_at == Some(index) {
            return Err(PortError::Rejected("signer locked".to_owned()));
        }
        g.signed.push(tx.clone());
        let bytes = serde_json::to_vec(tx)
            .map_err(|e| PortError::Validation(format!("encode failed: {e}")))?;
        Ok(SignedTransaction(bytes))
    }
}

#[async_trait]
impl MathProvider for MockMathProvider {
    fn signer_account(&self) -> Option<Value> {
        self.state.lock().expect("math state").account.clone()
    }

    async fn login(&self, _contract_id: &str) -> Result<Option<Value>, PortError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let mut g = self.state.lock().expect("math state");
        let result = g.login_result.clone();
        if result.as_ref().map_or(false, |v| !v.is_null()) {
            g.account = g.account_after_login.clone();
        }
        Ok(result)
    }

    async fn logout(&self) -> Result<bool, PortError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        let mut g = self.state.lock().expect("math state");
        if g.logout_result {
            g.account = None;
        }
        Ok(g.logout_result)
    }
}

/// Decodes the mock signer's JSON payload and answers with the receiver id.
#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    pub sent: Mutex<Vec<Transaction>>,
    pub fail_at: Option<usize>,
}

impl RecordingBroadcaster {
    pub fn failing_at(index: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_at: Some(index),
        }
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn send_transaction(
        &self,
        signed: &SignedTransaction,
    ) -> Result<TransactionOutcome, PortError> {
        let tx: Transaction = serde_json::from_slice(signed.as_bytes())
            .map_err(|e| PortError::Validation(format!("decode failed: {e}")))?;
        let mut g = self.sent.lock().expect("sent lock");
        if self.fail_at == Some(g.len()) {
            return Err(PortError::Transport("node unreachable".to_owned()));
        }
        g.push(tx.clone());
        Ok(json!({ "receiverId": tx.receiver_id, "status": { "SuccessValue": "" } }))
    }
}
