use std::fmt;

use super::{OrderReceipt, TradeIntent};
use crate::execution::errors::FlowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AssetsResolved,
    AmountsNormalized,
    /// Limit orders only.
    DurationClamped,
    Authorized,
    Submitted,
    Succeeded,
    Failed,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Succeeded | FlowState::Failed)
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowState::Idle => "idle",
            FlowState::AssetsResolved => "assets-resolved",
            FlowState::AmountsNormalized => "amounts-normalized",
            FlowState::DurationClamped => "duration-clamped",
            FlowState::Authorized => "authorized",
            FlowState::Submitted => "submitted",
            FlowState::Succeeded => "succeeded",
            FlowState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Terminal record of one flow invocation.
///
/// Keeps the typed failure and the last state reached even though [`FlowOutcome::message`]
/// flattens both into one string for the caller.
#[derive(Debug)]
pub struct FlowOutcome {
    intent: TradeIntent,
    last_state: FlowState,
    result: Result<OrderReceipt, FlowError>,
    explorer_url: Option<String>,
}

impl FlowOutcome {
    pub fn succeeded(intent: TradeIntent, receipt: OrderReceipt, explorer_url: String) -> Self {
        Self {
            intent,
            last_state: FlowState::Submitted,
            result: Ok(receipt),
            explorer_url: Some(explorer_url),
        }
    }

    pub fn failed(intent: TradeIntent, last_state: FlowState, error: FlowError) -> Self {
        Self {
            intent,
            last_state,
            result: Err(error),
            explorer_url: None,
        }
    }

    pub fn state(&self) -> FlowState {
        if self.result.is_ok() {
            FlowState::Succeeded
        } else {
            FlowState::Failed
        }
    }

    /// Last non-terminal state the flow reached.
    pub fn last_state(&self) -> FlowState {
        self.last_state
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn receipt(&self) -> Option<&OrderReceipt> {
        self.result.as_ref().ok()
    }

    pub fn order_id(&self) -> Option<&str> {
        self.receipt().map(|r| r.order_id.as_str())
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.result.as_ref().err()
    }

    pub fn explorer_url(&self) -> Option<&str> {
        self.explorer_url.as_deref()
    }

    pub fn message(&self) -> String {
        match (&self.result, &self.explorer_url) {
            (Ok(receipt), Some(url)) => format!(
                "Submitted the trade id {} to solvers.\nYou can view the trade at {} Trade {} of {} for {}.\n",
                receipt.order_id,
                url,
                self.intent.source_amount,
                self.intent.source_asset_id,
                self.intent.destination_asset_id
            ),
            (Ok(receipt), None) => format!(
                "Submitted the trade id {} to solvers.\n",
                receipt.order_id
            ),
            (Err(e), _) => format!("Error trading assets {}", e),
        }
    }
}

impl fmt::Display for FlowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::errors::FlowErrorKind;

    #[test]
    fn success_message_links_the_order() {
        let outcome = FlowOutcome::succeeded(
            TradeIntent::market("1", "eth", "arb"),
            OrderReceipt {
                order_id: "abc123".into(),
            },
            "https://explorer.cow.fi/arb1/orders/abc123?tab=overview".into(),
        );

        assert_eq!(outcome.state(), FlowState::Succeeded);
        assert_eq!(
            outcome.message(),
            "Submitted the trade id abc123 to solvers.\n\
             You can view the trade at https://explorer.cow.fi/arb1/orders/abc123?tab=overview \
             Trade 1 of eth for arb.\n"
        );
    }

    #[test]
    fn failure_message_is_flat_but_kind_is_kept() {
        let outcome = FlowOutcome::failed(
            TradeIntent::market("1", "eth", "arb"),
            FlowState::Authorized,
            FlowError::OrderRejected {
                status: 400,
                body: "insufficient liquidity".into(),
            },
        );

        assert_eq!(outcome.state(), FlowState::Failed);
        assert_eq!(outcome.last_state(), FlowState::Authorized);
        assert!(outcome.message().starts_with("Error trading assets "));
        assert!(outcome.message().contains("insufficient liquidity"));
        assert_eq!(
            outcome.error().map(FlowError::kind),
            Some(FlowErrorKind::OrderRejected)
        );
        assert!(outcome.order_id().is_none());
    }

    #[test]
    fn terminal_states() {
        assert!(FlowState::Succeeded.is_terminal());
        assert!(FlowState::Failed.is_terminal());
        assert!(!FlowState::Submitted.is_terminal());
    }
}
