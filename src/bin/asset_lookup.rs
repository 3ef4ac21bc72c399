use anyhow::Result;
use cow_order_agent::assets::{AssetResolver, TokenDirectory};
use cow_order_agent::config::Config;
use cow_order_agent::domain::normalize;
use ethers::prelude::{Http, Provider};
use ethers::utils::to_checksum;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let ids: Vec<String> = std::env::args().skip(1).collect();
    if ids.is_empty() {
        anyhow::bail!("Usage: cargo run --bin asset_lookup <SYMBOL|ADDRESS>...");
    }

    let config_path = std::env::var("CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let mut config = Config::load(&config_path)?;
    config.apply_env_overrides();

    let provider = Provider::<Http>::try_from(config.chain.rpc_url.as_str())?;
    let directory = TokenDirectory::new(
        config.chain.network_id.clone(),
        config.assets.clone(),
        Arc::new(provider),
    );
    let resolver = AssetResolver::new(Arc::new(directory));

    println!("\n=== ASSET LOOKUP ({}) ===", config.chain.network_id);

    for id in &ids {
        match resolver.resolve(id).await {
            Ok(asset) => {
                println!("✅ {}", id);
                println!("   Address:  {}", to_checksum(&asset.contract_address, None));
                println!("   Decimals: {}", asset.decimal_precision);
                match normalize("1", asset.decimal_precision) {
                    Ok(one) => println!("   1 {} = {} base units", id, one),
                    Err(e) => println!("   Cannot express 1 {}: {}", id, e),
                }
            }
            Err(e) => println!("❌ {}: {}", id, e),
        }
    }

    println!("========================\n");
    Ok(())
}
