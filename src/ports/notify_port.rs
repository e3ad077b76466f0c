//! Outbound notification port trait.

use crate::domain::error::TrendgateError;

pub trait NotifyPort {
    /// Deliver a plain-text message. Callers must isolate failures:
    /// an undelivered message never affects trading decisions or
    /// persisted state.
    fn send(&self, message: &str) -> Result<(), TrendgateError>;
}
