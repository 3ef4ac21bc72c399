use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::utils::to_checksum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::AssetDirectory;
use crate::domain::AssetMetadata;

abigen!(
    Erc20Metadata,
    r#"[
        function decimals() view returns (uint8)
    ]"#
);

/// A token the directory knows by symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
}

impl AssetEntry {
    pub fn new(symbol: &str, address: &str, decimals: u8) -> Self {
        Self {
            symbol: symbol.to_string(),
            address: address.to_string(),
            decimals,
        }
    }
}

/// Tokens on Arbitrum One that can be traded by symbol without a chain lookup.
pub fn arbitrum_defaults() -> Vec<AssetEntry> {
    vec![
        AssetEntry::new("eth", "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1", 18),
        AssetEntry::new("weth", "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1", 18),
        AssetEntry::new("usdc", "0xaf88d065e77c8cC2239327C5EDb3A432268e5831", 6),
        AssetEntry::new("usdc.e", "0xFF970A61A04b1cA14834A43f5dE4533eBDDB5CC8", 6),
        AssetEntry::new("usdt", "0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9", 6),
        AssetEntry::new("arb", "0x912CE59144191C1204E64559FE8253a0e49E6548", 18),
        AssetEntry::new("wbtc", "0x2f2a2543B76A4166549F7aaB2e75Bef0aefC5B0f", 8),
        AssetEntry::new("dai", "0xDA10009cBd5D07dd0CeCc66161FC93D7c9000da1", 18),
    ]
}

// ==================================================
// DIRECTORY
// ==================================================

/// Symbol table first, then an ERC-20 `decimals()` probe for raw `0x…` addresses.
pub struct TokenDirectory<M> {
    network_id: String,
    entries: Vec<AssetEntry>,
    client: Arc<M>,
}

impl<M: Middleware + 'static> TokenDirectory<M> {
    pub fn new(network_id: impl Into<String>, entries: Vec<AssetEntry>, client: Arc<M>) -> Self {
        Self {
            network_id: network_id.into(),
            entries,
            client,
        }
    }

    fn configured(&self, asset_id: &str) -> Option<&AssetEntry> {
        let wanted = asset_id.trim();
        let wanted_address = parse_address(wanted);

        self.entries.iter().find(|entry| {
            entry.symbol.eq_ignore_ascii_case(wanted)
                || (wanted_address.is_some() && parse_address(&entry.address) == wanted_address)
        })
    }

    async fn probe_decimals(&self, address: Address) -> Result<u8> {
        Erc20Metadata::new(address, self.client.clone())
            .decimals()
            .call()
            .await
            .with_context(|| format!("decimals() call on {:?} failed", address))
    }
}

#[async_trait]
impl<M: Middleware + 'static> AssetDirectory for TokenDirectory<M> {
    async fn fetch(&self, network_id: &str, asset_id: &str) -> Result<AssetMetadata> {
        if network_id != self.network_id {
            warn!(
                "refusing lookup of {} on {}, only {} is served",
                asset_id, network_id, self.network_id
            );
            return Ok(AssetMetadata::default());
        }

        if let Some(entry) = self.configured(asset_id) {
            return Ok(AssetMetadata::known(
                entry.address.clone(),
                i64::from(entry.decimals),
            ));
        }

        let Some(address) = parse_address(asset_id.trim()) else {
            debug!("{} is neither a known symbol nor an address", asset_id);
            return Ok(AssetMetadata::default());
        };

        let decimals = self.probe_decimals(address).await?;
        Ok(AssetMetadata::known(
            to_checksum(&address, None),
            i64::from(decimals),
        ))
    }
}

fn parse_address(raw: &str) -> Option<Address> {
    if raw.len() == 42 && (raw.starts_with("0x") || raw.starts_with("0X")) {
        raw[2..].parse().ok()
    } else {
        None
    }
}
