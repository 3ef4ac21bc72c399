use thiserror::Error;

/// Everything that can end an order flow.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Asset is not supported or Invalid asset ID: {0}")]
    UnsupportedAsset(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid order duration: {0}")]
    InvalidDuration(String),

    #[error("Approval of sell token failed: {0}")]
    AuthorizationFailed(String),

    #[error("Error posting order on CoW Swap: {body}")]
    OrderRejected { status: u16, body: String },

    #[error("Malformed order response: {0}")]
    MalformedResponse(String),

    #[error("Error posting order on CoW Swap: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowErrorKind {
    UnsupportedAsset,
    InvalidAmount,
    InvalidDuration,
    AuthorizationFailed,
    OrderRejected,
    MalformedResponse,
    Transport,
}

impl FlowError {
    pub fn kind(&self) -> FlowErrorKind {
        match self {
            FlowError::UnsupportedAsset(_) => FlowErrorKind::UnsupportedAsset,
            FlowError::InvalidAmount(_) => FlowErrorKind::InvalidAmount,
            FlowError::InvalidDuration(_) => FlowErrorKind::InvalidDuration,
            FlowError::AuthorizationFailed(_) => FlowErrorKind::AuthorizationFailed,
            FlowError::OrderRejected { .. } => FlowErrorKind::OrderRejected,
            FlowError::MalformedResponse(_) => FlowErrorKind::MalformedResponse,
            FlowError::Transport(_) => FlowErrorKind::Transport,
        }
    }

    /// True for failures caused by what the caller typed, before anything touched the chain.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.kind(),
            FlowErrorKind::UnsupportedAsset
                | FlowErrorKind::InvalidAmount
                | FlowErrorKind::InvalidDuration
        )
    }
}
