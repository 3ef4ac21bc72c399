use std::num::IntErrorKind;

use crate::execution::errors::FlowError;

/// Shortest validity window a limit order may have: 10 minutes.
pub const MIN_LIMIT_DURATION_SECS: u64 = 60 * 10;

/// Widens limit order durations that are shorter than the allowed minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPolicy {
    min_secs: u64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            min_secs: MIN_LIMIT_DURATION_SECS,
        }
    }
}

impl DurationPolicy {
    pub fn new(min_secs: u64) -> Self {
        Self { min_secs }
    }

    pub fn min_secs(&self) -> u64 {
        self.min_secs
    }

    /// Never rejects: anything below the minimum (negatives included) becomes the minimum.
    pub fn clamp(&self, requested_secs: i64) -> u64 {
        u64::try_from(requested_secs).map_or(self.min_secs, |secs| secs.max(self.min_secs))
    }

    /// Only non-integers fail; integers too large or too small for `i64` saturate.
    pub fn parse_and_clamp(&self, requested: &str) -> Result<u64, FlowError> {
        let trimmed = requested.trim();
        match trimmed.parse::<i64>() {
            Ok(secs) => Ok(self.clamp(secs)),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(trimmed.parse::<u64>().unwrap_or(u64::MAX)),
                IntErrorKind::NegOverflow => Ok(self.min_secs),
                _ => Err(FlowError::InvalidDuration(format!(
                    "`{}` is not a whole number of seconds",
                    trimmed
                ))),
            },
        }
    }

    /// Effective duration for a limit order; no requested duration means the minimum.
    pub fn effective(&self, requested: Option<&str>) -> Result<u64, FlowError> {
        match requested {
            Some(raw) => self.parse_and_clamp(raw),
            None => Ok(self.min_secs),
        }
    }
}
