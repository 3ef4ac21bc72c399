pub mod allowance;
pub mod signer;

pub use allowance::{Authorizer, ContractInvoker, EthersContractInvoker};
pub use signer::{Wallet, WalletSigner};
