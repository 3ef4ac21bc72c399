use std::sync::Arc;

use log::{info, warn};

use super::errors::FlowError;
use super::submitter::OrderSubmitter;
use crate::assets::AssetResolver;
use crate::domain::{
    normalize, DurationPolicy, ExplorerLink, FlowOutcome, FlowState, OrderKind, OrderReceipt,
    OrderRequest, ResolvedAsset, TradeIntent,
};
use crate::logging::{log_rejection, log_revoke_failed, log_success, log_transition};
use crate::wallet::{Authorizer, Wallet};

/// Endpoints and policies shared by every flow run.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub market_order_url: String,
    pub limit_order_url: String,
    pub explorer: ExplorerLink,
    pub duration_policy: DurationPolicy,
    /// Set the allowance back to zero when the order post fails after approval.
    pub revoke_on_failure: bool,
}

impl FlowSettings {
    fn endpoint(&self, kind: &OrderKind) -> &str {
        match kind {
            OrderKind::Market => &self.market_order_url,
            OrderKind::Limit { .. } => &self.limit_order_url,
        }
    }
}

/// Runs one trade intent from asset lookup to an accepted order.
///
/// Steps run strictly in order and the first failure ends the run; nothing is retried and
/// nothing is rolled back unless `revoke_on_failure` is set.
pub struct FlowController {
    resolver: AssetResolver,
    authorizer: Authorizer,
    submitter: OrderSubmitter,
    wallet: Arc<dyn Wallet>,
    settings: FlowSettings,
}

struct Progress {
    state: FlowState,
}

impl Progress {
    fn advance(&mut self, next: FlowState) {
        debug_assert!(!next.is_terminal());
        log_transition(self.state, next);
        self.state = next;
    }
}

impl FlowController {
    pub fn new(
        resolver: AssetResolver,
        authorizer: Authorizer,
        submitter: OrderSubmitter,
        wallet: Arc<dyn Wallet>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            resolver,
            authorizer,
            submitter,
            wallet,
            settings,
        }
    }

    /// Runs the flow and renders the caller-facing message.
    pub async fn run(&self, intent: TradeIntent) -> String {
        self.execute(intent).await.message()
    }

    pub async fn execute(&self, intent: TradeIntent) -> FlowOutcome {
        info!(
            "🚀 {} order: {} {} -> {}",
            if intent.is_limit() { "Limit" } else { "Market" },
            intent.source_amount,
            intent.source_asset_id,
            intent.destination_asset_id
        );

        let mut progress = Progress {
            state: FlowState::Idle,
        };

        match self.drive(&intent, &mut progress).await {
            Ok(receipt) => {
                log_transition(progress.state, FlowState::Succeeded);
                let url = self.settings.explorer.order_url(&receipt.order_id);
                log_success(&format!("Order {} submitted: {}", receipt.order_id, url));
                FlowOutcome::succeeded(intent, receipt, url)
            }
            Err(e) => {
                log_transition(progress.state, FlowState::Failed);
                if e.is_input_error() {
                    warn!("⚠️ Trade request refused: {}", e);
                } else {
                    log_rejection(&format!("{} (after {})", e, progress.state));
                }
                FlowOutcome::failed(intent, progress.state, e)
            }
        }
    }

    async fn drive(
        &self,
        intent: &TradeIntent,
        progress: &mut Progress,
    ) -> Result<OrderReceipt, FlowError> {
        let sell = self.resolver.resolve(&intent.source_asset_id).await?;
        let buy = self.resolver.resolve(&intent.destination_asset_id).await?;
        progress.advance(FlowState::AssetsResolved);

        let sell_amount = normalize(&intent.source_amount, sell.decimal_precision)?;
        let buy_amount = match &intent.kind {
            OrderKind::Market => None,
            OrderKind::Limit { target_amount, .. } => {
                Some(normalize(target_amount, buy.decimal_precision)?)
            }
        };
        progress.advance(FlowState::AmountsNormalized);

        let duration = match &intent.kind {
            OrderKind::Market => None,
            OrderKind::Limit {
                validity_seconds, ..
            } => {
                let secs = self
                    .settings
                    .duration_policy
                    .effective(validity_seconds.as_deref())?;
                progress.advance(FlowState::DurationClamped);
                Some(secs)
            }
        };

        self.authorizer
            .authorize(&sell, &sell_amount)
            .await?;
        progress.advance(FlowState::Authorized);

        let mut request =
            OrderRequest::market(&sell, &buy, &sell_amount, self.wallet.owner_address());
        if let (Some(buy_amount), Some(duration)) = (buy_amount, duration) {
            request = request.with_limit(&buy_amount, duration);
        }

        match self
            .submitter
            .submit(self.settings.endpoint(&intent.kind), &request)
            .await
        {
            Ok(receipt) => {
                progress.advance(FlowState::Submitted);
                Ok(receipt)
            }
            Err(e) => {
                self.compensate(&sell).await;
                Err(e)
            }
        }
    }

    async fn compensate(&self, sell: &ResolvedAsset) {
        if !self.settings.revoke_on_failure {
            warn!(
                "⚠️ Relayer allowance on {} stays in place after the failed order",
                sell.asset_id
            );
            return;
        }

        if let Err(e) = self.authorizer.revoke(sell).await {
            log_revoke_failed(&sell.asset_id, &e.to_string());
        }
    }
}
