//! Console notification channel.
//!
//! Default delivery channel: the message goes to stdout. Other channels
//! plug in behind [`NotifyPort`](crate::ports::notify_port::NotifyPort).

use crate::domain::error::TrendgateError;
use crate::ports::notify_port::NotifyPort;

pub struct ConsoleNotifier;

impl NotifyPort for ConsoleNotifier {
    fn send(&self, message: &str) -> Result<(), TrendgateError> {
        println!("{message}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_always_succeeds() {
        assert!(ConsoleNotifier.send("US100 daily summary").is_ok());
    }
}
