use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical "who is signed in" record. The only account shape that leaves the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    pub account_id: String,
}

impl AccountState {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractState {
    pub contract_id: String,
    #[serde(default)]
    pub method_names: Vec<String>,
}

impl ContractState {
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            method_names: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub network_id: String,
    pub node_url: String,
}

impl NetworkConfig {
    pub fn testnet() -> Self {
        Self {
            network_id: "testnet".to_owned(),
            node_url: "https://rpc.testnet.near.org".to_owned(),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            network_id: "mainnet".to_owned(),
            node_url: "https://rpc.mainnet.near.org".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInParams {
    pub contract_id: String,
    #[serde(default)]
    pub method_names: Vec<String>,
}

impl SignInParams {
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            method_names: Vec::new(),
        }
    }
}

impl From<&ContractState> for SignInParams {
    fn from(contract: &ContractState) -> Self {
        Self {
            contract_id: contract.contract_id.clone(),
            method_names: contract.method_names.clone(),
        }
    }
}

impl From<SignInParams> for ContractState {
    fn from(params: SignInParams) -> Self {
        Self {
            contract_id: params.contract_id,
            method_names: params.method_names,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallParams {
    pub method_name: String,
    pub args: Value,
    pub gas: String,
    pub deposit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeyPermission {
    pub receiver_id: String,
    #[serde(default)]
    pub allowance: Option<String>,
    #[serde(default)]
    pub method_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKey {
    #[serde(default)]
    pub nonce: Option<u64>,
    /// `None` means full access.
    #[serde(default)]
    pub permission: Option<AccessKeyPermission>,
}

/// A single action inside a transaction, tagged the way injected wallets expect it:
/// `{ "type": "FunctionCall", "params": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Action {
    CreateAccount,
    DeployContract {
        code: Vec<u8>,
    },
    FunctionCall(FunctionCallParams),
    Transfer {
        deposit: String,
    },
    Stake {
        stake: String,
        #[serde(rename = "publicKey")]
        public_key: String,
    },
    AddKey {
        #[serde(rename = "publicKey")]
        public_key: String,
        #[serde(rename = "accessKey")]
        access_key: AccessKey,
    },
    DeleteKey {
        #[serde(rename = "publicKey")]
        public_key: String,
    },
    DeleteAccount {
        #[serde(rename = "beneficiaryId")]
        beneficiary_id: String,
    },
}

impl Action {
    pub fn function_call(
        method_name: impl Into<String>,
        args: Value,
        gas: impl Into<String>,
        deposit: impl Into<String>,
    ) -> Self {
        Self::FunctionCall(FunctionCallParams {
            method_name: method_name.into(),
            args,
            gas: gas.into(),
            deposit: deposit.into(),
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::CreateAccount => ActionKind::CreateAccount,
            Self::DeployContract { .. } => ActionKind::DeployContract,
            Self::FunctionCall(_) => ActionKind::FunctionCall,
            Self::Transfer { .. } => ActionKind::Transfer,
            Self::Stake { .. } => ActionKind::Stake,
            Self::AddKey { .. } => ActionKind::AddKey,
            Self::DeleteKey { .. } => ActionKind::DeleteKey,
            Self::DeleteAccount { .. } => ActionKind::DeleteAccount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    CreateAccount,
    DeployContract,
    FunctionCall,
    Transfer,
    Stake,
    AddKey,
    DeleteKey,
    DeleteAccount,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Transaction as supplied by the caller; missing ids are filled from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<String>,
    pub actions: Vec<Action>,
}

impl PartialTransaction {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            signer_id: None,
            receiver_id: None,
            actions,
        }
    }

    pub fn with_receiver(mut self, receiver_id: impl Into<String>) -> Self {
        self.receiver_id = Some(receiver_id.into());
        self
    }

    pub fn with_signer(mut self, signer_id: impl Into<String>) -> Self {
        self.signer_id = Some(signer_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub signer_id: String,
    pub receiver_id: String,
    pub actions: Vec<Action>,
}

/// Bytes produced by the external signer. Never inspected, only forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction(pub Vec<u8>);

impl SignedTransaction {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Opaque execution outcome returned by a provider or the broadcaster.
pub type TransactionOutcome = Value;

/// Account and contract as seen at the start of a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub account: Option<AccountState>,
    pub contract: Option<ContractState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    Injected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMetadata {
    pub name: String,
    pub description: Option<String>,
    pub icon_url: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WalletType,
    pub metadata: WalletMetadata,
}
