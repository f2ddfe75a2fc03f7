use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use serde::Serialize;

use crate::{
    events::{Events, APP_FAULT},
    log_error,
};

pub const FAULT_MESSAGE: &str = "Oops! Something went wrong. Please refresh the page.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fault {
    pub operation: String,
    pub message: String,
    /// Only filled in debug mode.
    pub details: Option<String>,
}

/// Top-level error boundary. The first failed operation replaces the page
/// with a generic failure screen until [`FaultBoundary::clear`].
#[derive(Clone)]
pub struct FaultBoundary {
    events: Events,
    debug: bool,
    fault: Arc<Mutex<Option<Fault>>>,
}

impl FaultBoundary {
    pub fn new(events: Events, debug: bool) -> Self {
        Self {
            events,
            debug,
            fault: Arc::new(Mutex::new(None)),
        }
    }

    /// Passes `Ok` through. An `Err` trips the boundary and comes back as the
    /// text the webview shows.
    pub fn guard<T>(&self, operation: &str, result: Result<T>) -> Result<T, String> {
        result.map_err(|err| {
            log_error!("{operation} failed: {err:#}");
            let fault = Fault {
                operation: operation.to_string(),
                message: FAULT_MESSAGE.to_string(),
                details: self.debug.then(|| format!("{err:#}")),
            };
            self.events.emit(APP_FAULT, &fault);
            let shown = fault.details.clone().unwrap_or_else(|| fault.message.clone());
            *self.fault.lock().unwrap_or_else(PoisonError::into_inner) = Some(fault);
            shown
        })
    }

    pub fn current(&self) -> Option<Fault> {
        self.fault
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        *self.fault.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use anyhow::anyhow;

    #[test]
    fn errors_trip_the_boundary() {
        let sink = MemorySink::new();
        let boundary = FaultBoundary::new(Events::new(sink.clone()), false);

        assert_eq!(boundary.guard("noop", Ok(3)), Ok(3));
        assert!(boundary.current().is_none());

        let err = boundary
            .guard::<()>("write_flag", Err(anyhow!("disk full")))
            .unwrap_err();
        assert_eq!(err, FAULT_MESSAGE);

        let fault = boundary.current().unwrap();
        assert_eq!(fault.operation, "write_flag");
        assert!(fault.details.is_none());
        assert_eq!(sink.named(APP_FAULT)[0]["message"], FAULT_MESSAGE);

        boundary.clear();
        assert!(boundary.current().is_none());
    }

    #[test]
    fn debug_mode_shows_details() {
        let boundary = FaultBoundary::new(Events::discard(), true);
        let err = boundary
            .guard::<()>("load", Err(anyhow!("inner").context("outer")))
            .unwrap_err();
        assert_eq!(err, "outer: inner");
    }
}
