use cow_order_agent::*;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use config::{Args, Config};
use ethers::prelude::{Http, Middleware, Provider, SignerMiddleware};
use log::info;
use std::sync::Arc;

use assets::{AssetResolver, TokenDirectory};
use execution::{FlowController, OrderSubmitter};
use wallet::{Authorizer, EthersContractInvoker, Wallet, WalletSigner};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args = Args::parse();
    let mut config = Config::load(&args.config)?;
    config.apply_env_overrides();
    config.validate()?;

    // ===============================
    // PROVIDER (pinned to Arbitrum One)
    // ===============================
    let provider = Provider::<Http>::try_from(config.chain.rpc_url.as_str())
        .context("RPC_URL is not a valid HTTP endpoint")?;

    let chain_id = provider.get_chainid().await?.as_u64();
    if chain_id != config.chain.chain_id {
        bail!(
            "RPC serves chain {}, trades are only supported on {} (chain {})",
            chain_id,
            config.chain.network_id,
            config.chain.chain_id
        );
    }

    // ===============================
    // WALLET SIGNER - READ FROM .ENV
    // ===============================
    let private_key = std::env::var("PRIVATE_KEY").context("PRIVATE_KEY missing in .env file")?;
    let signer = WalletSigner::new(&private_key, chain_id)?;
    info!("🔑 Signer loaded: {}", signer.owner_address());

    let client = Arc::new(SignerMiddleware::new(
        provider.clone(),
        signer.local_wallet(),
    ));

    // ===============================
    // FLOW
    // ===============================
    let directory = TokenDirectory::new(
        config.chain.network_id.clone(),
        config.assets.clone(),
        Arc::new(provider),
    );
    let invoker = EthersContractInvoker::new(client, config.chain.confirmations);

    let flow = FlowController::new(
        AssetResolver::new(Arc::new(directory)),
        Authorizer::new(Arc::new(invoker), config.relayer()?),
        OrderSubmitter::new(config.http_timeout())?,
        Arc::new(signer),
        config.flow_settings(),
    );

    let outcome = flow.execute(args.command.into_intent()).await;

    if outcome.is_success() {
        println!("{}", outcome.message().green());
        Ok(())
    } else {
        eprintln!("{}", outcome.message().red());
        std::process::exit(1);
    }
}
