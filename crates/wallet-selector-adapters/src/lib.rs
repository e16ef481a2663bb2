pub mod config;
pub mod host;
pub mod math;
pub mod rpc;
pub mod sender;
mod session;

pub use config::AdapterConfig;
pub use host::SharedHostState;
pub use math::{setup_math_wallet, MathProvider, MathWallet, MathWalletModule, MATH_WALLET_ID};
pub use rpc::RpcBroadcaster;
pub use sender::{
    setup_sender_wallet, SenderProvider, SenderSignInRequest, SenderSignInResponse,
    SenderTransactionRequest, SenderTransactionResponse, SenderWallet, SenderWalletModule,
    SENDER_WALLET_ID,
};
