//! Presentation port.

use delve_domain::RunEvent;

/// Receives battle log lines, progress updates and run outcomes.
/// Publishing never fails; a sink with no listener drops events.
#[cfg_attr(test, mockall::automock)]
pub trait RunEventSink: Send + Sync {
    fn publish(&self, event: RunEvent);
}
