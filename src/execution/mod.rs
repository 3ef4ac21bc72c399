pub mod errors;
pub mod flow;
pub mod submitter;

pub use errors::{FlowError, FlowErrorKind};
pub use flow::{FlowController, FlowSettings};
pub use submitter::OrderSubmitter;
