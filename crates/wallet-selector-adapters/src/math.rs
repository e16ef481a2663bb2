use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use wallet_selector_core::{
    ensure_truthy, needs_relogin, normalize_accounts, transform_transactions, AccountState,
    ActionPolicy, AdapterState, Broadcaster, ContractState, HostPort, Lifecycle, LifecycleAction,
    ModuleDescriptor, NetworkConfig, PartialTransaction, PortError, ProviderSlot,
    RawSignedInAccount, SignInParams, StateUpdate, TransactionOutcome, TransactionSigner, Wallet,
    WalletEnvironment, WalletError, WalletMetadata, WalletModule, WalletResult, WalletType,
};

use crate::session::{notify_signed_in, notify_signed_out, ActiveContract};
use crate::AdapterConfig;

pub const MATH_WALLET_ID: &str = "math-wallet";

const MATH_DOWNLOAD_URL: &str =
    "https://chrome.google.com/webstore/detail/math-wallet/afbcbjpbpfadlkmhmclhkeeodmamcflc";

/// Surface of the Math extension. Transactions are signed by its signer and
/// broadcast separately.
#[async_trait]
pub trait MathProvider: TransactionSigner {
    /// Raw `signer.account` object; its shape depends on how the extension was loaded.
    fn signer_account(&self) -> Option<Value>;

    /// Returns a falsy value instead of failing when the user declines.
    async fn login(&self, contract_id: &str) -> Result<Option<Value>, PortError>;

    /// Advisory: `false` is not an error for this wallet.
    async fn logout(&self) -> Result<bool, PortError>;
}

pub struct MathWallet {
    provider: Arc<dyn MathProvider>,
    host: Arc<dyn HostPort>,
    broadcaster: Arc<dyn Broadcaster>,
    network: NetworkConfig,
    contract: ActiveContract,
    lifecycle: Arc<Lifecycle>,
}

impl std::fmt::Debug for MathWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathWallet")
            .field("network", &self.network)
            .field("contract", &self.contract)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

impl MathWallet {
    fn new(
        provider: Arc<dyn MathProvider>,
        env: &WalletEnvironment,
        config: &AdapterConfig,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        Self {
            provider,
            host: Arc::clone(&env.host),
            broadcaster: Arc::clone(&env.broadcaster),
            network: config.network.clone(),
            contract: ActiveContract::new(env.contract.clone().or_else(|| config.contract.clone())),
            lifecycle,
        }
    }

    fn raw_account(&self) -> Option<RawSignedInAccount> {
        self.provider
            .signer_account()
            .as_ref()
            .and_then(RawSignedInAccount::from_value)
    }

    fn accounts(&self) -> Vec<AccountState> {
        normalize_accounts(self.raw_account().as_ref())
    }

    /// After an extension reload the signer holds a `{ address }` record that cannot
    /// sign. When a contract is already known, log in once to get a usable record back.
    /// Returns whether a re-login was attempted.
    async fn heal_stale_account(&self) -> bool {
        let Some(contract) = self.contract.get() else {
            return false;
        };
        if !needs_relogin(self.raw_account().as_ref(), Some(&contract)) {
            return false;
        }
        tracing::info!(contract_id = %contract.contract_id, "MathWallet: re-login to replace stale account");
        if let Err(e) = self.provider.login(&contract.contract_id).await {
            tracing::warn!(error = %e, "MathWallet: stale account re-login failed");
        }
        true
    }
}

#[async_trait]
impl Wallet for MathWallet {
    fn id(&self) -> &str {
        MATH_WALLET_ID
    }

    async fn sign_in(&self, params: SignInParams) -> WalletResult<Vec<AccountState>> {
        let existing = self.accounts();
        if !existing.is_empty() {
            return Ok(existing);
        }

        tracing::debug!(contract_id = %params.contract_id, "MathWallet:signIn");
        let result = self
            .provider
            .login(&params.contract_id)
            .await
            .map_err(WalletError::sign_in)?;
        ensure_truthy(result, || {
            WalletError::SignInFailed("provider login returned no result".to_owned())
        })?;

        let accounts = self.accounts();
        if accounts.is_empty() {
            return Err(WalletError::InvalidProviderResponse(
                "login succeeded but signer exposes no account".to_owned(),
            ));
        }
        self.contract.set(params.into());
        self.lifecycle.apply(LifecycleAction::SignIn)?;
        tracing::info!(account_id = %accounts[0].account_id, "MathWallet signed in");
        notify_signed_in(self.host.as_ref(), MATH_WALLET_ID, &accounts);
        Ok(accounts)
    }

    async fn sign_out(&self) -> WalletResult<()> {
        let signed_out = self.provider.logout().await.map_err(WalletError::sign_out)?;
        if !signed_out {
            tracing::debug!("MathWallet: logout reported false, ignoring");
        }
        self.lifecycle.apply(LifecycleAction::SignOut)?;
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
        tracing::debug!(count = txs.len(), "MathWallet:signAndSendTransactions");
        let session = self.contract.snapshot(self.accounts());
        if session.account.is_none() {
            return Err(WalletError::NotSignedIn);
        }
        let txs = transform_transactions(MATH_WALLET_ID, txs, &session, ActionPolicy::Any)?;

        // Sign everything first: a signing failure must not leave a half-broadcast batch.
        let mut signed = Vec::with_capacity(txs.len());
        for tx in &txs {
            signed.push(
                self.provider
                    .sign_transaction(tx, &self.network)
                    .await
                    .map_err(WalletError::sign)?,
            );
        }
        tracing::debug!(count = signed.len(), "MathWallet:signAndSendTransactions:signed");

        let mut outcomes = Vec::with_capacity(signed.len());
        for (index, tx) in signed.iter().enumerate() {
            let outcome = self
                .broadcaster
                .send_transaction(tx)
                .await
                .map_err(|e| WalletError::send(index, e))?;
            outcomes.push(outcome);
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

pub struct MathWalletModule {
    descriptor: ModuleDescriptor,
    slot: ProviderSlot<dyn MathProvider>,
    config: AdapterConfig,
    lifecycle: Arc<Lifecycle>,
    wallet: Mutex<Option<Arc<MathWallet>>>,
}

impl std::fmt::Debug for MathWalletModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathWalletModule")
            .field("descriptor", &self.descriptor)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

/// `None` on mobile or when the extension never shows up within the probe window.
pub async fn setup_math_wallet(
    slot: ProviderSlot<dyn MathProvider>,
    config: AdapterConfig,
) -> Option<MathWalletModule> {
    if config.mobile {
        return None;
    }
    if slot.wait_for(|_| true, config.probe_options()).await.is_none() {
        tracing::debug!("MathWallet not detected");
        return None;
    }
    Some(MathWalletModule::new(slot, config))
}

impl MathWalletModule {
    pub fn new(slot: ProviderSlot<dyn MathProvider>, config: AdapterConfig) -> Self {
        Self {
            descriptor: ModuleDescriptor {
                id: MATH_WALLET_ID.to_owned(),
                kind: WalletType::Injected,
                metadata: WalletMetadata {
                    name: "Math Wallet".to_owned(),
                    description: None,
                    icon_url: config.math_icon_url.clone(),
                    download_url: MATH_DOWNLOAD_URL.to_owned(),
                },
            },
            slot,
            config,
            lifecycle: Arc::new(Lifecycle::default()),
            wallet: Mutex::new(None),
        }
    }

    pub fn state(&self) -> AdapterState {
        self.lifecycle.current()
    }

    pub fn wallet(&self) -> Option<Arc<MathWallet>> {
        self.wallet.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl WalletModule for MathWalletModule {
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
            .wait_for(|_| true, self.config.probe_options())
            .await
        else {
            self.lifecycle.apply(LifecycleAction::ProbeFailed)?;
            env.host.update(StateUpdate::WalletNotInstalled {
                wallet_id: MATH_WALLET_ID.to_owned(),
            });
            return Err(WalletError::NotInstalled(MATH_WALLET_ID.to_owned()));
        };

        let wallet = Arc::new(MathWallet::new(
            provider,
            &env,
            &self.config,
            Arc::clone(&self.lifecycle),
        ));
        if self.config.heal_stale_account {
            wallet.heal_stale_account().await;
        }

        let signed_in = !wallet.accounts().is_empty();
        self.lifecycle
            .apply(LifecycleAction::ProbeSucceeded { signed_in })?;

        *self.wallet.lock().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&wallet));
        Ok(wallet as Arc<dyn Wallet>)
    }
}
