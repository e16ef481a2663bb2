use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use wallet_selector_core::accounts::accounts_from_id;
use wallet_selector_core::sentinel::is_falsy;
use wallet_selector_core::{
    ensure_truthy, event_channel, function_call_params, transform_transactions, AccountState,
    ActionKind, ActionPolicy, AdapterState, ContractState, EventBridge, EventSink,
    FunctionCallParams, HostPort, Lifecycle, LifecycleAction, ModuleDescriptor,
    PartialTransaction, PortError, ProviderEventKind, ProviderSlot, SignInParams, StateUpdate,
    TransactionOutcome, Wallet, WalletEnvironment, WalletError, WalletMetadata, WalletModule,
    WalletResult, WalletType,
};

use crate::session::{notify_signed_in, notify_signed_out, ActiveContract};
use crate::AdapterConfig;

pub const SENDER_WALLET_ID: &str = "sender-wallet";

const SENDER_DOWNLOAD_URL: &str =
    "https://chrome.google.com/webstore/detail/sender-wallet/epapihdplajcdnnkdeiahlgigofloibg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderSignInRequest {
    pub contract_id: String,
    pub method_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderSignInResponse {
    #[serde(default)]
    pub access_key: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderTransactionRequest {
    pub receiver_id: String,
    pub actions: Vec<FunctionCallParams>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderTransactionResponse {
    #[serde(default)]
    pub response: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Surface of the Sender extension. It signs and submits transactions itself and only
/// understands function calls.
#[async_trait]
pub trait SenderProvider: Send + Sync {
    fn is_sender(&self) -> bool;

    fn get_account_id(&self) -> Option<String>;

    fn is_signed_in(&self) -> bool;

    async fn request_sign_in(
        &self,
        request: SenderSignInRequest,
    ) -> Result<SenderSignInResponse, PortError>;

    /// `false` means the sign-out did not happen.
    async fn sign_out(&self) -> Result<bool, PortError>;

    async fn sign_and_send_transaction(
        &self,
        request: SenderTransactionRequest,
    ) -> Result<SenderTransactionResponse, PortError>;

    fn on(&self, kind: ProviderEventKind, sink: EventSink) -> Result<(), PortError>;
}

pub struct SenderWallet {
    provider: Arc<dyn SenderProvider>,
    host: Arc<dyn HostPort>,
    contract: ActiveContract,
    lifecycle: Arc<Lifecycle>,
    subscribed: AtomicBool,
}

impl std::fmt::Debug for SenderWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderWallet")
            .field("contract", &self.contract)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

impl SenderWallet {
    fn new(
        provider: Arc<dyn SenderProvider>,
        env: &WalletEnvironment,
        config: &AdapterConfig,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        Self {
            provider,
            host: Arc::clone(&env.host),
            contract: ActiveContract::new(env.contract.clone().or_else(|| config.contract.clone())),
            lifecycle,
            subscribed: AtomicBool::new(false),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.provider.is_signed_in()
    }

    /// Registers account and network handlers on the provider. Only the first call registers.
    fn subscribe(&self, sink: EventSink) -> WalletResult<bool> {
        if self.subscribed.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        for kind in [ProviderEventKind::AccountChanged, ProviderEventKind::NetworkChanged] {
            self.provider.on(kind, sink.clone()).map_err(|e| {
                self.subscribed.store(false, Ordering::SeqCst);
                WalletError::InvalidProviderResponse(format!("failed to subscribe to {kind:?}: {e}"))
            })?;
        }
        Ok(true)
    }

    fn accounts(&self) -> Vec<AccountState> {
        accounts_from_id(self.provider.get_account_id())
    }
}

#[async_trait]
impl Wallet for SenderWallet {
    fn id(&self) -> &str {
        SENDER_WALLET_ID
    }

    async fn sign_in(&self, params: SignInParams) -> WalletResult<Vec<AccountState>> {
        let existing = self.accounts();
        if !existing.is_empty() {
            return Ok(existing);
        }

        tracing::debug!(contract_id = %params.contract_id, "SenderWallet:signIn");
        let response = self
            .provider
            .request_sign_in(SenderSignInRequest {
                contract_id: params.contract_id.clone(),
                method_names: params.method_names.clone(),
            })
            .await
            .map_err(WalletError::sign_in)?;
        if let Some(err) = response.error.filter(|e| !is_falsy(e)) {
            return Err(WalletError::SignInFailed(err.to_string()));
        }
        ensure_truthy(response.access_key, || {
            WalletError::SignInFailed("provider returned no access key".to_owned())
        })?;

        let accounts = self.accounts();
        if accounts.is_empty() {
            return Err(WalletError::InvalidProviderResponse(
                "sign-in succeeded but no account is exposed".to_owned(),
            ));
        }
        self.contract.set(params.into());
        self.lifecycle.apply(LifecycleAction::SignIn)?;
        tracing::info!(account_id = %accounts[0].account_id, "SenderWallet signed in");
        notify_signed_in(self.host.as_ref(), SENDER_WALLET_ID, &accounts);
        Ok(accounts)
    }

    async fn sign_out(&self) -> WalletResult<()> {
        let signed_out = self.provider.sign_out().await.map_err(WalletError::sign_out)?;
        if !signed_out {
            return Err(WalletError::SignOutFailed(
                "provider reported sign-out failure".to_owned(),
            ));
        }
        self.lifecycle.apply(LifecycleAction::SignOut)?;
        tracing::info!("SenderWallet signed out");
        notify_signed_out(self.host.as_ref(), &self.accounts());
        Ok(())
    }

    async fn get_accounts(&self) -> Vec<AccountState> {
        self.accounts()
    }

    async fn sign_and_send_transaction(
        &self,
        tx: PartialTransaction,
    ) -> WalletResult<TransactionOutcome> {
        self.sign_and_send_transactions(vec![tx])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::InvalidProviderResponse("no outcome returned".to_owned()))
    }

    async fn sign_and_send_transactions(
        &self,
        txs: Vec<PartialTransaction>,
    ) -> WalletResult<Vec<TransactionOutcome>> {
        tracing::debug!(count = txs.len(), "SenderWallet:signAndSendTransactions");
        let session = self.contract.snapshot(self.accounts());
        if session.account.is_none() {
            return Err(WalletError::NotSignedIn);
        }

        let txs = transform_transactions(
            SENDER_WALLET_ID,
            txs,
            &session,
            ActionPolicy::Only(ActionKind::FunctionCall),
        )?;
        let requests = txs
            .iter()
            .map(|tx| {
                Ok(SenderTransactionRequest {
                    receiver_id: tx.receiver_id.clone(),
                    actions: function_call_params(SENDER_WALLET_ID, &tx.actions)?,
                })
            })
            .collect::<WalletResult<Vec<_>>>()?;

        let mut outcomes = Vec::with_capacity(requests.len());
        for (index, request) in requests.into_iter().enumerate() {
            let response = self
                .provider
                .sign_and_send_transaction(request)
                .await
                .map_err(|e| WalletError::send(index, e))?;
            outcomes.push(response_outcome(index, response)?);
        }
        Ok(outcomes)
    }

    fn session_contract(&self) -> Option<ContractState> {
        self.contract.get()
    }

    async fn state(&self) -> AdapterState {
        let phase = self.lifecycle.current();
        if !phase.is_available() {
            return phase;
        }
        if self.accounts().is_empty() {
            AdapterState::SignedOut
        } else {
            AdapterState::SignedIn
        }
    }
}

fn response_outcome(
    index: usize,
    response: SenderTransactionResponse,
) -> WalletResult<TransactionOutcome> {
    if let Some(err) = response.error.filter(|e| !is_falsy(e)) {
        return Err(WalletError::SendFailed {
            completed: index,
            reason: err.as_str().map_or_else(|| err.to_string(), str::to_owned),
        });
    }
    response
        .response
        .and_then(|outcomes| outcomes.into_iter().next())
        .ok_or_else(|| WalletError::InvalidProviderResponse("empty transaction response".to_owned()))
}

pub struct SenderWalletModule {
    descriptor: ModuleDescriptor,
    slot: ProviderSlot<dyn SenderProvider>,
    config: AdapterConfig,
    lifecycle: Arc<Lifecycle>,
    wallet: Mutex<Option<Arc<SenderWallet>>>,
}

impl std::fmt::Debug for SenderWalletModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderWalletModule")
            .field("descriptor", &self.descriptor)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

/// Offers the Sender module only on desktop and once the extension answers the probe.
pub async fn setup_sender_wallet(
    slot: ProviderSlot<dyn SenderProvider>,
    config: AdapterConfig,
) -> Option<SenderWalletModule> {
    if config.mobile {
        return None;
    }
    let module = SenderWalletModule::new(slot, config);
    if module.is_available().await {
        Some(module)
    } else {
        tracing::debug!("SenderWallet not detected");
        None
    }
}

impl SenderWalletModule {
    pub fn new(slot: ProviderSlot<dyn SenderProvider>, config: AdapterConfig) -> Self {
        Self {
            descriptor: ModuleDescriptor {
                id: SENDER_WALLET_ID.to_owned(),
                kind: WalletType::Injected,
                metadata: WalletMetadata {
                    name: "Sender Wallet".to_owned(),
                    description: None,
                    icon_url: config.sender_icon_url.clone(),
                    download_url: SENDER_DOWNLOAD_URL.to_owned(),
                },
            },
            slot,
            config,
            lifecycle: Arc::new(Lifecycle::default()),
            wallet: Mutex::new(None),
        }
    }

    pub async fn is_available(&self) -> bool {
        !self.config.mobile
            && self
                .slot
                .wait_for(|p| p.is_sender(), self.config.probe_options())
                .await
                .is_some()
    }

    pub fn state(&self) -> AdapterState {
        self.lifecycle.current()
    }

    /// The adapter created by a successful `init`, if any.
    pub fn wallet(&self) -> Option<Arc<SenderWallet>> {
        self.wallet.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl WalletModule for SenderWalletModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn init(&self, env: WalletEnvironment) -> WalletResult<Arc<dyn Wallet>> {
        if let Some(wallet) = self.wallet() {
            return Ok(wallet as Arc<dyn Wallet>);
        }

        self.lifecycle.apply(LifecycleAction::StartProbe)?;
        let Some(provider) = self
            .slot
            .wait_for(|p| p.is_sender(), self.config.probe_options())
            .await
        else {
            self.lifecycle.apply(LifecycleAction::ProbeFailed)?;
            env.host.update(StateUpdate::WalletNotInstalled {
                wallet_id: SENDER_WALLET_ID.to_owned(),
            });
            return Err(WalletError::NotInstalled(SENDER_WALLET_ID.to_owned()));
        };

        let wallet = Arc::new(SenderWallet::new(
            provider,
            &env,
            &self.config,
            Arc::clone(&self.lifecycle),
        ));
        let (sink, events) = event_channel();
        if let Err(e) = wallet.subscribe(sink) {
            self.lifecycle.apply(LifecycleAction::ProbeFailed)?;
            return Err(e);
        }

        let signed_in = !wallet.accounts().is_empty();
        self.lifecycle
            .apply(LifecycleAction::ProbeSucceeded { signed_in })?;

        let as_dyn: Arc<dyn Wallet> = wallet.clone();
        let bridge = EventBridge::new(
            &as_dyn,
            Arc::clone(&env.host),
            self.config.network.network_id.clone(),
            wallet
                .contract
                .get()
                .map(|c| SignInParams::from(&c)),
        );
        tokio::spawn(bridge.run(events));

        *self.wallet.lock().unwrap_or_else(|e| e.into_inner()) = Some(wallet);
        Ok(as_dyn)
    }
}
