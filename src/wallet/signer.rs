use anyhow::{Context, Result};
use ethers::prelude::*;
use ethers::utils::to_checksum;

/// The held wallet as the order flow sees it.
///
/// Only a public reference ever leaves this trait; key material stays behind it.
pub trait Wallet: Send + Sync {
    /// EIP-55 address that owns the order.
    fn owner_address(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct WalletSigner {
    wallet: LocalWallet,
}

impl WalletSigner {
    pub fn new(private_key: &str, chain_id: u64) -> Result<Self> {
        let wallet: LocalWallet = private_key
            .trim()
            .parse()
            .context("PRIVATE_KEY is not a valid secp256k1 key")?;
        Ok(Self {
            wallet: wallet.with_chain_id(chain_id),
        })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Signer handed to the chain client so approvals are sent from this wallet.
    pub fn local_wallet(&self) -> LocalWallet {
        self.wallet.clone()
    }
}

impl Wallet for WalletSigner {
    fn owner_address(&self) -> String {
        to_checksum(&self.wallet.address(), None)
    }
}
