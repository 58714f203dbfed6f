//! # Messenger
//!
//! Opens chat deep links. Opening is fire-and-forget: a link that the shell
//! fails to open never rolls back the order that produced it.
//!
//! ```text
//! command ──► persist ──► chat_link() ──► Messenger::open(uri)
//!                                           │
//!                          ┌────────────────┴────────────────┐
//!                          ▼                                 ▼
//!                  TracingMessenger                   OutboxMessenger
//!                  (log only)                         (shell drains links)
//! ```

use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Something that can hand a chat deep link to the user's device.
pub trait Messenger: Send + Sync {
    fn open(&self, uri: &str);
}

/// Logs each link and does nothing else.
#[derive(Debug, Default)]
pub struct TracingMessenger;

impl Messenger for TracingMessenger {
    fn open(&self, uri: &str) {
        info!(uri, "Opening chat link");
    }
}

/// Collects links for the shell to open.
#[derive(Debug, Default)]
pub struct OutboxMessenger {
    links: Mutex<Vec<String>>,
}

impl OutboxMessenger {
    pub fn new() -> Self {
        OutboxMessenger::default()
    }

    /// Removes and returns every queued link, oldest first.
    pub fn drain(&self) -> Vec<String> {
        let mut links = self.links.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *links)
    }
}

impl Messenger for OutboxMessenger {
    fn open(&self, uri: &str) {
        self.links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(uri.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbox_drains_in_order() {
        let outbox = OutboxMessenger::new();
        outbox.open("https://api.whatsapp.com/send?phone=1&text=a");
        outbox.open("https://api.whatsapp.com/send?phone=2&text=b");

        let links = outbox.drain();
        assert_eq!(links.len(), 2);
        assert!(links[0].contains("phone=1"));
        assert!(outbox.drain().is_empty());
    }
}
