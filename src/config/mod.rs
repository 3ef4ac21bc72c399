use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::assets::directory::{arbitrum_defaults, AssetEntry};
use crate::assets::NETWORK_ID;
use crate::domain::{DurationPolicy, ExplorerLink, TradeIntent, MIN_LIMIT_DURATION_SECS};
use crate::execution::FlowSettings;

/// Arbitrum One.
pub const ARBITRUM_CHAIN_ID: u64 = 42161;

/// CoW Protocol relayer that pulls sell tokens on settlement.
pub const COW_RELAYER_ADDRESS: &str = "0xC92E8bdf79f0507f65a392b0ab4667716BFE0110";

/* =======================
CLI ARGS
======================= */

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: TradeCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TradeCommand {
    /// Sell a fixed amount for whatever the solvers return
    Market {
        /// Amount of the sell asset, e.g. `15` or `0.000001`
        #[arg(long)]
        amount: String,
        /// Sell asset: symbol (`eth`, `usdc`) or token address
        #[arg(long)]
        from: String,
        /// Buy asset: symbol or token address
        #[arg(long)]
        to: String,
    },
    /// Sell a fixed amount for at least a given amount, valid for a duration
    Limit {
        #[arg(long)]
        amount_from: String,
        #[arg(long)]
        amount_to: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Validity in seconds; anything under ten minutes is widened to ten minutes
        #[arg(long)]
        duration: Option<String>,
    },
}

impl TradeCommand {
    pub fn into_intent(self) -> TradeIntent {
        match self {
            TradeCommand::Market { amount, from, to } => TradeIntent::market(amount, from, to),
            TradeCommand::Limit {
                amount_from,
                amount_to,
                from,
                to,
                duration,
            } => TradeIntent::limit(amount_from, amount_to, from, to, duration),
        }
    }
}

/* =======================
MAIN CONFIG
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chain: ChainConfig,
    pub venue: VenueConfig,
    #[serde(default)]
    pub limit_orders: LimitOrderConfig,
    #[serde(default)]
    pub authorization: AuthorizationConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "arbitrum_defaults")]
    pub assets: Vec<AssetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub network_id: String,
    pub chain_id: u64,
    pub rpc_url: String,
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    pub api_base_url: String,
    pub market_order_path: String,
    pub limit_order_path: String,
    pub relayer_address: String,
    pub explorer_host: String,
    pub chain_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitOrderConfig {
    pub min_duration_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    pub revoke_on_failure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

fn default_confirmations() -> usize {
    1
}

/* =======================
DEFAULT CONFIG
======================= */

impl Default for LimitOrderConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: MIN_LIMIT_DURATION_SECS,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain: ChainConfig {
                network_id: NETWORK_ID.to_string(),
                chain_id: ARBITRUM_CHAIN_ID,
                rpc_url: "https://arb1.arbitrum.io/rpc".to_string(),
                confirmations: default_confirmations(),
            },
            venue: VenueConfig {
                api_base_url: "http://localhost:3000/api".to_string(),
                market_order_path: "createCoWOrder".to_string(),
                limit_order_path: "createLimitOrder".to_string(),
                relayer_address: COW_RELAYER_ADDRESS.to_string(),
                explorer_host: "explorer.cow.fi".to_string(),
                chain_path: "arb1".to_string(),
            },
            limit_orders: LimitOrderConfig::default(),
            authorization: AuthorizationConfig::default(),
            http: HttpConfig::default(),
            assets: arbitrum_defaults(),
        }
    }
}

/* =======================
LOAD / CREATE CONFIG
======================= */

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            let cfg = Config::default();
            let content = serde_json::to_string_pretty(&cfg)?;
            std::fs::write(path, content)
                .with_context(|| format!("writing default config to {}", path.display()))?;
            Ok(cfg)
        }
    }

    /// `RPC_URL` and `ORDER_API_URL` from the environment win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(rpc_url) = std::env::var("RPC_URL") {
            self.chain.rpc_url = rpc_url;
        }
        if let Ok(api_url) = std::env::var("ORDER_API_URL") {
            self.venue.api_base_url = api_url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chain.network_id != NETWORK_ID {
            bail!(
                "trades are only supported on {}, config asks for {}",
                NETWORK_ID,
                self.chain.network_id
            );
        }
        Url::parse(&self.chain.rpc_url).context("chain.rpc_url is not a URL")?;
        Url::parse(&self.market_order_url()).context("market order endpoint is not a URL")?;
        Url::parse(&self.limit_order_url()).context("limit order endpoint is not a URL")?;
        self.relayer()?;
        if self.http.timeout_secs == 0 {
            bail!("http.timeout_secs must be at least 1");
        }
        for asset in &self.assets {
            asset
                .address
                .parse::<Address>()
                .with_context(|| format!("asset {} has an invalid address", asset.symbol))?;
        }
        Ok(())
    }

    pub fn relayer(&self) -> Result<Address> {
        self.venue
            .relayer_address
            .parse()
            .context("venue.relayer_address is not an address")
    }

    pub fn market_order_url(&self) -> String {
        join_url(&self.venue.api_base_url, &self.venue.market_order_path)
    }

    pub fn limit_order_url(&self) -> String {
        join_url(&self.venue.api_base_url, &self.venue.limit_order_path)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    pub fn flow_settings(&self) -> FlowSettings {
        FlowSettings {
            market_order_url: self.market_order_url(),
            limit_order_url: self.limit_order_url(),
            explorer: ExplorerLink {
                host: self.venue.explorer_host.clone(),
                chain_path: self.venue.chain_path.clone(),
            },
            duration_policy: DurationPolicy::new(self.limit_orders.min_duration_secs),
            revoke_on_failure: self.authorization.revoke_on_failure,
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let cfg = Config::load(&path).unwrap();

        assert!(path.exists());
        assert_eq!(cfg.chain.chain_id, ARBITRUM_CHAIN_ID);
        assert_eq!(Config::load(&path).unwrap().venue.relayer_address, COW_RELAYER_ADDRESS);
    }

    #[test]
    fn optional_sections_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "chain": { "network_id": "arbitrum-mainnet", "chain_id": 42161, "rpc_url": "http://localhost:8545" },
                "venue": {
                    "api_base_url": "http://localhost:3000/api/",
                    "market_order_path": "/createCoWOrder",
                    "limit_order_path": "createLimitOrder",
                    "relayer_address": "0xC92E8bdf79f0507f65a392b0ab4667716BFE0110",
                    "explorer_host": "explorer.cow.fi",
                    "chain_path": "arb1"
                }
            }"#,
        )
        .unwrap();

        let cfg = Config::load(&path).unwrap();
        cfg.validate().unwrap();

        assert_eq!(cfg.chain.confirmations, 1);
        assert_eq!(cfg.limit_orders.min_duration_secs, 600);
        assert!(!cfg.authorization.revoke_on_failure);
        assert_eq!(cfg.assets, arbitrum_defaults());
        assert_eq!(cfg.market_order_url(), "http://localhost:3000/api/createCoWOrder");
        assert_eq!(cfg.limit_order_url(), "http://localhost:3000/api/createLimitOrder");
    }

    #[test]
    fn other_networks_are_refused() {
        let mut cfg = Config::default();
        cfg.chain.network_id = "base-mainnet".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_http_timeout_is_refused() {
        let mut cfg = Config::default();
        cfg.http.timeout_secs = 0;
        assert!(cfg.validate().is_err());

        cfg.http.timeout_secs = 1;
        cfg.validate().unwrap();
    }

    #[test]
    fn bad_relayer_is_refused() {
        let mut cfg = Config::default();
        cfg.venue.relayer_address = "relayer".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn flow_settings_carry_policies() {
        let mut cfg = Config::default();
        cfg.limit_orders.min_duration_secs = 900;
        cfg.authorization.revoke_on_failure = true;

        let settings = cfg.flow_settings();

        assert_eq!(settings.duration_policy.min_secs(), 900);
        assert!(settings.revoke_on_failure);
        assert_eq!(
            settings.explorer.order_url("x"),
            "https://explorer.cow.fi/arb1/orders/x?tab=overview"
        );
    }

    #[test]
    fn limit_command_becomes_limit_intent() {
        let args = Args::parse_from([
            "cow-order-agent",
            "limit",
            "--amount-from",
            "1",
            "--amount-to",
            "2000",
            "--from",
            "eth",
            "--to",
            "usdc",
            "--duration",
            "30",
        ]);

        assert_eq!(args.config, PathBuf::from("config.json"));
        let intent = args.command.into_intent();
        assert!(intent.is_limit());
        assert_eq!(intent.destination_asset_id, "usdc");
    }
}
