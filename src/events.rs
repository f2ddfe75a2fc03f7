//! Outbound events for whatever renders the pages.
//!
//! Controllers never talk to the webview directly; they emit named JSON
//! payloads through an [`EventSink`]. The desktop shell forwards them to the
//! Tauri window, tests record them with [`MemorySink`].

use std::sync::{Arc, Mutex};

use log::warn;
use serde::Serialize;
use serde_json::Value;

pub const COUNTDOWN_TICK: &str = "countdown-tick";
pub const BIRTHDAY_REACHED: &str = "birthday-reached";
pub const PAGE_TRANSITION_STARTED: &str = "page-transition-started";
pub const PAGE_CHANGED: &str = "page-changed";
pub const EFFECT: &str = "effect";
pub const APP_FAULT: &str = "app-fault";

pub trait EventSink: Send + Sync + 'static {
    fn emit_value(&self, event: &str, payload: Value);
}

/// Cloneable handle around a shared sink.
#[derive(Clone)]
pub struct Events {
    sink: Arc<dyn EventSink>,
}

impl Events {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Drops everything. Handy for hosts that poll snapshots instead.
    pub fn discard() -> Self {
        Self::new(Arc::new(DiscardSink))
    }

    pub fn emit<T: Serialize>(&self, event: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.sink.emit_value(event, value),
            Err(err) => warn!("failed to serialize {event} payload: {err}"),
        }
    }
}

struct DiscardSink;

impl EventSink for DiscardSink {
    fn emit_value(&self, _event: &str, _payload: Value) {}
}

/// Keeps every emitted event in memory, in order.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<(String, Value)>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(String, Value)> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn named(&self, event: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|(name, _)| name == event)
            .map(|(_, payload)| payload)
            .collect()
    }

    pub fn count(&self, event: &str) -> usize {
        self.named(event).len()
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl EventSink for MemorySink {
    fn emit_value(&self, event: &str, payload: Value) {
        let mut guard = match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((event.to_string(), payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_sink_keeps_order_and_filters_by_name() {
        let sink = MemorySink::new();
        let events = Events::new(sink.clone());

        events.emit(PAGE_CHANGED, &json!({ "page": "celebration" }));
        events.emit(EFFECT, &json!({ "kind": "finale" }));
        events.emit(PAGE_CHANGED, &json!({ "page": "message" }));

        assert_eq!(sink.events().len(), 3);
        assert_eq!(sink.count(PAGE_CHANGED), 2);
        assert_eq!(sink.named(PAGE_CHANGED)[1]["page"], "message");

        sink.clear();
        assert!(sink.events().is_empty());
    }
}
