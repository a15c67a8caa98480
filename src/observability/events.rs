//! Process lifecycle events

use std::fmt;

/// Observable lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Startup complete, ready to serve
    BootComplete,
    /// Startup aborted
    BootFailed,
    /// Shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,

    // Database
    /// Connection pool opened
    DatabaseConnected,
    /// `items` table and index ensured
    SchemaBootstrapped,
    /// Connection pool closed
    DatabaseClosed,

    // Server
    /// Listener bound, accepting requests
    Serving,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "ITEMSTORE_STARTUP_BEGIN",
            Event::BootComplete => "ITEMSTORE_STARTUP_COMPLETE",
            Event::BootFailed => "ITEMSTORE_STARTUP_FAILED",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::DatabaseConnected => "DATABASE_CONNECTED",
            Event::SchemaBootstrapped => "SCHEMA_BOOTSTRAPPED",
            Event::DatabaseClosed => "DATABASE_CLOSED",

            Event::Serving => "ITEMSTORE_SERVING",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
