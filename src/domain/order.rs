use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};

use super::{NormalizedAmount, ResolvedAsset};

/// Body posted to the order-creation service.
///
/// Amounts travel as base-10 strings, `duration` as a JSON integer. Market orders omit
/// `buyAmount` and `duration` entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub sell_token: String,
    pub buy_token: String,
    pub sell_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub owner_address: String,
}

impl OrderRequest {
    pub fn market(
        sell: &ResolvedAsset,
        buy: &ResolvedAsset,
        sell_amount: &NormalizedAmount,
        owner_address: String,
    ) -> Self {
        Self {
            sell_token: to_checksum(&sell.contract_address, None),
            buy_token: to_checksum(&buy.contract_address, None),
            sell_amount: sell_amount.to_string(),
            buy_amount: None,
            duration: None,
            owner_address,
        }
    }

    pub fn with_limit(mut self, buy_amount: &NormalizedAmount, duration_secs: u64) -> Self {
        self.buy_amount = Some(buy_amount.to_string());
        self.duration = Some(duration_secs);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: String,
}

// ==================================================
// EXPLORER
// ==================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerLink {
    pub host: String,
    pub chain_path: String,
}

impl Default for ExplorerLink {
    fn default() -> Self {
        Self {
            host: "explorer.cow.fi".to_string(),
            chain_path: "arb1".to_string(),
        }
    }
}

impl ExplorerLink {
    pub fn order_url(&self, order_id: &str) -> String {
        format!(
            "https://{}/{}/orders/{}?tab=overview",
            self.host.trim_matches('/'),
            self.chain_path.trim_matches('/'),
            order_id
        )
    }
}
