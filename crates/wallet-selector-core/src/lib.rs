pub mod accounts;
pub mod availability;
pub mod bridge;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod sentinel;
pub mod state_machine;
pub mod transform;
pub mod wallet;

pub use accounts::{normalize_accounts, needs_relogin, RawSignedInAccount};
pub use availability::{probe, ProbeOptions, ProviderSlot};
pub use bridge::{BridgeOutcome, EventBridge};
pub use domain::{
    AccessKey, AccessKeyPermission, AccountState, Action, ActionKind, ContractState,
    FunctionCallParams, ModuleDescriptor, NetworkConfig, PartialTransaction, SessionContext,
    SignInParams, SignedTransaction, Transaction, TransactionOutcome, WalletMetadata, WalletType,
};
pub use error::{WalletError, WalletResult};
pub use events::{ProviderEvent, ProviderEventKind, SessionFlags, StateUpdate, WalletEvent};
pub use ports::{
    event_channel, Broadcaster, EventSink, EventStream, HostPort, PortError, TransactionSigner,
};
pub use sentinel::ensure_truthy;
pub use state_machine::{adapter_transition, AdapterState, Lifecycle, LifecycleAction, TransitionError};
pub use transform::{function_call_params, transform_transactions, ActionPolicy};
pub use wallet::{Wallet, WalletEnvironment, WalletModule};
