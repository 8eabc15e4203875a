//! Analytics sink
//!
//! Fire-and-forget event logging. Nothing here feeds back into the game.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

/// Key/value payload attached to an event
pub type EventFields = BTreeMap<String, Value>;

pub trait Analytics {
    fn log_event(&mut self, name: &str, fields: &EventFields);
}

/// Writes events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnalytics;

impl Analytics for LogAnalytics {
    fn log_event(&mut self, name: &str, fields: &EventFields) {
        if fields.is_empty() {
            log::info!("analytics: {}", name);
        } else {
            let payload = serde_json::to_string(fields).unwrap_or_default();
            log::info!("analytics: {} {}", name, payload);
        }
    }
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnalytics;

impl Analytics for NullAnalytics {
    fn log_event(&mut self, _name: &str, _fields: &EventFields) {}
}

/// Keeps events in memory; clones share the same list
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    events: Rc<RefCell<Vec<(String, EventFields)>>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, EventFields)> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(name, _)| name.clone()).collect()
    }
}

impl Analytics for RecordingAnalytics {
    fn log_event(&mut self, name: &str, fields: &EventFields) {
        self.events
            .borrow_mut()
            .push((name.to_string(), fields.clone()));
    }
}

/// Build a payload from `(key, value)` pairs
pub fn event_fields<const N: usize>(pairs: [(&str, Value); N]) -> EventFields {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recording_shares_between_clones() {
        let recorder = RecordingAnalytics::new();
        let mut sink = recorder.clone();
        sink.log_event("app_start", &EventFields::new());
        sink.log_event("player_death", &event_fields([("score", json!(4))]));

        assert_eq!(recorder.names(), vec!["app_start", "player_death"]);
        assert_eq!(recorder.events()[1].1.get("score"), Some(&json!(4)));
    }
}
