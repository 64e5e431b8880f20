//! Interaction tracking hook
//!
//! Every simulated user action is reported here. The shipped tracker only
//! logs; a real analytics sink would implement the same trait.

#[cfg(test)]
use std::cell::RefCell;

use serde_json::Value;
use tracing::info;

pub trait InteractionTracker {
    /// Fire-and-forget; implementations must not panic or block
    fn record(&self, event: &str, payload: Option<&Value>);
}

/// Logs every interaction at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracker;

impl InteractionTracker for LogTracker {
    fn record(&self, event: &str, payload: Option<&Value>) {
        match payload {
            Some(payload) => info!(target: "interaction", event = %event, payload = %payload, "Interaction"),
            None => info!(target: "interaction", event = %event, "Interaction"),
        }
    }
}

/// Keeps recorded events in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingTracker {
    events: RefCell<Vec<(String, Option<Value>)>>,
}

#[cfg(test)]
impl RecordingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, Option<Value>)> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(name, _)| name.clone()).collect()
    }
}

#[cfg(test)]
impl InteractionTracker for RecordingTracker {
    fn record(&self, event: &str, payload: Option<&Value>) {
        // try_borrow_mut: a re-entrant record from a subscriber must not panic
        if let Ok(mut events) = self.events.try_borrow_mut() {
            events.push((event.to_string(), payload.cloned()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recording_tracker_keeps_order_and_payload() {
        let tracker = RecordingTracker::new();
        tracker.record("add_to_cart", Some(&json!({ "productId": 1 })));
        tracker.record("open_cart", None);

        let events = tracker.events();
        assert_eq!(tracker.names(), vec!["add_to_cart", "open_cart"]);
        assert_eq!(events[0].1, Some(json!({ "productId": 1 })));
        assert_eq!(events[1].1, None);
    }

    #[test]
    fn test_log_tracker_accepts_any_payload() {
        let tracker = LogTracker;
        tracker.record("like_post", Some(&json!({ "postId": 3, "liked": true })));
        tracker.record("navigate", None);
    }
}
