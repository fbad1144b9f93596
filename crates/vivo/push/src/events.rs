//! Event collection for delivery calls.

use tokio::sync::mpsc::UnboundedSender;
use vivo_core::{DeliveryEvent, DeliveryFailure, DeliveryReport, GatewayReply, PushError};

/// Records success/failure events on the report and forwards them to an
/// optional subscriber.
pub(crate) struct EventLog {
    events: Vec<DeliveryEvent>,
    subscriber: Option<UnboundedSender<DeliveryEvent>>,
}

impl EventLog {
    pub(crate) fn new(subscriber: Option<UnboundedSender<DeliveryEvent>>) -> Self {
        Self {
            events: Vec::new(),
            subscriber,
        }
    }

    pub(crate) fn success(&mut self, reply: GatewayReply) {
        self.record(DeliveryEvent::Success(reply));
    }

    pub(crate) fn error(&mut self, error: PushError) {
        self.record(DeliveryEvent::Failure(DeliveryFailure::Error(error)));
    }

    pub(crate) fn invalid_recipients(&mut self, reg_ids: Vec<String>) {
        self.record(DeliveryEvent::Failure(DeliveryFailure::InvalidRecipients(
            reg_ids,
        )));
    }

    /// Attach the collected events and send the terminal event.
    pub(crate) fn finish(self, mut report: DeliveryReport) -> DeliveryReport {
        report.events = self.events;
        if let Some(subscriber) = self.subscriber {
            // a dropped receiver only means nobody is listening
            let _ = subscriber.send(DeliveryEvent::Finished(report.clone()));
        }
        report
    }

    fn record(&mut self, event: DeliveryEvent) {
        if let Some(subscriber) = &self.subscriber {
            let _ = subscriber.send(event.clone());
        }
        self.events.push(event);
    }
}
