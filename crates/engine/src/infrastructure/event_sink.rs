//! Run event sinks.

use tokio::sync::mpsc;

use delve_domain::RunEvent;

use crate::infrastructure::ports::RunEventSink;

/// Forwards events to an unbounded channel consumed by the presentation layer.
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl RunEventSink for ChannelEventSink {
    fn publish(&self, event: RunEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("Run event dropped, no receiver attached");
        }
    }
}

/// Writes events to the tracing log. Used when nothing renders them.
pub struct TracingEventSink;

impl RunEventSink for TracingEventSink {
    fn publish(&self, event: RunEvent) {
        match &event {
            RunEvent::BattleLog { message, tone } => {
                tracing::info!(tone = ?tone, "{}", message);
            }
            other => tracing::debug!(event = ?other, "Run event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_domain::LogTone;

    #[tokio::test]
    async fn channel_sink_delivers_in_order() {
        let (sink, mut receiver) = ChannelEventSink::new();
        sink.publish(RunEvent::log("first", LogTone::Info));
        sink.publish(RunEvent::log("second", LogTone::Success));

        assert_eq!(
            receiver.recv().await,
            Some(RunEvent::log("first", LogTone::Info))
        );
        assert_eq!(
            receiver.recv().await,
            Some(RunEvent::log("second", LogTone::Success))
        );
    }

    #[test]
    fn channel_sink_tolerates_dropped_receiver() {
        let (sink, receiver) = ChannelEventSink::new();
        drop(receiver);
        sink.publish(RunEvent::log("nobody listens", LogTone::Info));
    }
}
