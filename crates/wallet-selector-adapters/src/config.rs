use std::time::Duration;

use wallet_selector_core::{ContractState, NetworkConfig, ProbeOptions, SignInParams};

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub network: NetworkConfig,
    pub contract: Option<ContractState>,
    pub probe_timeout_ms: u64,
    pub probe_interval_ms: u64,
    /// Injected wallets are desktop extensions; modules hide themselves on mobile.
    pub mobile: bool,
    /// Re-login once at setup when the provider still holds a stale account record.
    pub heal_stale_account: bool,
    pub rpc_timeout_ms: u64,
    pub sender_icon_url: String,
    pub math_icon_url: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::testnet(),
            contract: None,
            probe_timeout_ms: 200,
            probe_interval_ms: 50,
            mobile: false,
            heal_stale_account: true,
            rpc_timeout_ms: 15_000,
            sender_icon_url: "./assets/sender-wallet-icon.png".to_owned(),
            math_icon_url: "./assets/math-wallet-icon.png".to_owned(),
        }
    }
}

impl AdapterConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(network_id) = env_string("WALLET_SELECTOR_NETWORK_ID") {
            cfg.network = match network_id.as_str() {
                "mainnet" => NetworkConfig::mainnet(),
                "testnet" => NetworkConfig::testnet(),
                _ => NetworkConfig {
                    network_id,
                    node_url: cfg.network.node_url,
                },
            };
        }
        if let Some(node_url) = env_string("WALLET_SELECTOR_NODE_URL") {
            cfg.network.node_url = node_url;
        }
        if let Some(contract_id) = env_string("WALLET_SELECTOR_CONTRACT_ID") {
            let method_names = env_string("WALLET_SELECTOR_METHOD_NAMES")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default();
            cfg.contract = Some(ContractState {
                contract_id,
                method_names,
            });
        }
        cfg.probe_timeout_ms = env_u64("WALLET_SELECTOR_PROBE_TIMEOUT_MS", cfg.probe_timeout_ms);
        cfg.probe_interval_ms = env_u64("WALLET_SELECTOR_PROBE_INTERVAL_MS", cfg.probe_interval_ms);
        cfg.rpc_timeout_ms = env_u64("WALLET_SELECTOR_RPC_TIMEOUT_MS", cfg.rpc_timeout_ms);
        cfg.mobile = env_bool("WALLET_SELECTOR_MOBILE", cfg.mobile);
        cfg.heal_stale_account =
            env_bool("WALLET_SELECTOR_HEAL_STALE_ACCOUNT", cfg.heal_stale_account);
        cfg
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            timeout: Duration::from_millis(self.probe_timeout_ms),
            interval: Duration::from_millis(self.probe_interval_ms.max(1)),
        }
    }

    pub fn sign_in_params(&self) -> Option<SignInParams> {
        self.contract.as_ref().map(SignInParams::from)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env_string(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!(key, %raw, error = %e, "ignoring invalid numeric setting");
            default
        }),
        None => default,
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env_string(key).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
