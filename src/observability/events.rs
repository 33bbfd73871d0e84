//! Gateway events
//!
//! Every line the gateway logs names one of these events.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    ConfigLoaded,
    ConfigInvalid,

    // Server lifecycle
    ServerStarting,
    Serving,
    ShutdownStart,
    ShutdownComplete,

    // Requests
    RequestComplete,
    AccessDenied,
    RequestRejected,

    // Execution
    ExecutionFailed,
    DriverUnavailable,
    UnmappedVendorSignal,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigInvalid => "CONFIG_INVALID",
            Event::ServerStarting => "SERVER_STARTING",
            Event::Serving => "TABLEGATE_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::RequestComplete => "REQUEST_COMPLETE",
            Event::AccessDenied => "ACCESS_DENIED",
            Event::RequestRejected => "REQUEST_REJECTED",
            Event::ExecutionFailed => "EXECUTION_FAILED",
            Event::DriverUnavailable => "DRIVER_UNAVAILABLE",
            Event::UnmappedVendorSignal => "UNMAPPED_VENDOR_SIGNAL",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigInvalid | Event::UnmappedVendorSignal | Event::DriverUnavailable => {
                Severity::Error
            }
            Event::AccessDenied | Event::ExecutionFailed | Event::RequestRejected => {
                Severity::Warn
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
