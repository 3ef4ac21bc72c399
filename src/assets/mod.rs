use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use ethers::types::Address;
use log::debug;

use crate::domain::{AssetMetadata, ResolvedAsset};
use crate::execution::errors::FlowError;

pub mod directory;

pub use directory::{AssetEntry, TokenDirectory};

/// Every trade is pinned to this network, whatever the caller asks for.
pub const NETWORK_ID: &str = "arbitrum-mainnet";

/// Looks up contract address and decimals for an asset identifier.
#[async_trait]
pub trait AssetDirectory: Send + Sync {
    async fn fetch(&self, network_id: &str, asset_id: &str) -> Result<AssetMetadata>;
}

pub struct AssetResolver {
    directory: Arc<dyn AssetDirectory>,
}

impl AssetResolver {
    pub fn new(directory: Arc<dyn AssetDirectory>) -> Self {
        Self { directory }
    }

    /// Resolves one asset on [`NETWORK_ID`]. Nothing is cached between calls.
    pub async fn resolve(&self, asset_id: &str) -> Result<ResolvedAsset, FlowError> {
        let metadata = self
            .directory
            .fetch(NETWORK_ID, asset_id)
            .await
            .map_err(|e| FlowError::UnsupportedAsset(format!("{} ({:#})", asset_id, e)))?;

        let unsupported = |why: &str| FlowError::UnsupportedAsset(format!("{} ({})", asset_id, why));

        let address = metadata
            .contract_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| unsupported("no contract address"))?;

        let contract_address: Address = address
            .parse()
            .map_err(|_| unsupported("contract address is not a valid address"))?;

        let decimals = metadata
            .decimals
            .ok_or_else(|| unsupported("no decimal precision"))?;
        let decimal_precision =
            u32::try_from(decimals).map_err(|_| unsupported("negative decimal precision"))?;

        debug!(
            "resolved {} -> {:?} ({} decimals)",
            asset_id, contract_address, decimal_precision
        );

        Ok(ResolvedAsset {
            asset_id: asset_id.to_string(),
            contract_address,
            decimal_precision,
        })
    }
}
