use ethers::types::{Address, H256};

pub mod amount;
pub mod order;
pub mod time;
pub mod trade_result;

pub use amount::{normalize, NormalizedAmount};
pub use order::{ExplorerLink, OrderReceipt, OrderRequest};
pub use time::{DurationPolicy, MIN_LIMIT_DURATION_SECS};
pub use trade_result::{FlowOutcome, FlowState};

// ==================================================
// TRADE INTENT
// ==================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderKind {
    /// Sell a fixed amount for whatever the solvers return.
    Market,
    /// Sell a fixed amount for at least `target_amount`, valid for `validity_seconds`.
    Limit {
        target_amount: String,
        validity_seconds: Option<String>,
    },
}

/// What the caller asked for, exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIntent {
    pub source_asset_id: String,
    pub destination_asset_id: String,
    pub source_amount: String,
    pub kind: OrderKind,
}

impl TradeIntent {
    pub fn market(
        source_amount: impl Into<String>,
        source_asset_id: impl Into<String>,
        destination_asset_id: impl Into<String>,
    ) -> Self {
        Self {
            source_asset_id: source_asset_id.into(),
            destination_asset_id: destination_asset_id.into(),
            source_amount: source_amount.into(),
            kind: OrderKind::Market,
        }
    }

    pub fn limit(
        source_amount: impl Into<String>,
        target_amount: impl Into<String>,
        source_asset_id: impl Into<String>,
        destination_asset_id: impl Into<String>,
        validity_seconds: Option<String>,
    ) -> Self {
        Self {
            source_asset_id: source_asset_id.into(),
            destination_asset_id: destination_asset_id.into(),
            source_amount: source_amount.into(),
            kind: OrderKind::Limit {
                target_amount: target_amount.into(),
                validity_seconds,
            },
        }
    }

    pub fn is_limit(&self) -> bool {
        matches!(self.kind, OrderKind::Limit { .. })
    }
}

// ==================================================
// ASSETS
// ==================================================

/// Raw answer of an asset directory, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMetadata {
    pub contract_address: Option<String>,
    pub decimals: Option<i64>,
}

impl AssetMetadata {
    pub fn known(contract_address: impl Into<String>, decimals: i64) -> Self {
        Self {
            contract_address: Some(contract_address.into()),
            decimals: Some(decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub asset_id: String,
    pub contract_address: Address,
    pub decimal_precision: u32,
}

// ==================================================
// AUTHORIZATION
// ==================================================

/// Proof that the relayer allowance was confirmed on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationReceipt {
    pub token: Address,
    pub spender: Address,
    pub amount: NormalizedAmount,
    pub tx_hash: H256,
}
