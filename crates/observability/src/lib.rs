//! `shelfwise-observability`: structured JSON logging for binaries and tests.

/// Install the JSON subscriber with the `info` fallback filter.
///
/// Repeat calls leave the first subscriber in place.
pub fn init() {
    tracing::init();
}

pub mod tracing;
