//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Per-operation observation scopes
//!
//! # Usage
//!
//! ```ignore
//! use itemstore::observability::{log_event, Event, Logger, ObservationScope};
//!
//! log_event(Event::Serving);
//! Logger::info("ITEM_CREATED", &[("id", "42")]);
//!
//! let scope = ObservationScope::new("ITEM_CREATE");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

fn event_severity(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event_severity(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}
