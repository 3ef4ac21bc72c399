use log::{debug, error, info, warn};

use crate::domain::FlowState;

pub fn log_transition(from: FlowState, to: FlowState) {
    debug!("flow {} -> {}", from, to);
}

pub fn log_approval(token: &str, spender: &str, amount: &str) {
    info!("🔐 Approving {} of {} for relayer {}", amount, token, spender);
}

pub fn log_rejection(reason: &str) {
    error!("❌ Rejected: {}", reason);
}

pub fn log_revoke_failed(token: &str, reason: &str) {
    warn!("⚠️ Allowance on {} left in place, revoke failed: {}", token, reason);
}

pub fn log_success(msg: &str) {
    info!("✅ {}", msg);
}
