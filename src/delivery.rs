use std::sync::Arc;

use crate::{document::Document, event_bus::EventBusSocket, events::Flow};

/// Pulls published events off the bus and fires them on the document one at a
/// time, so listeners never run concurrently.
pub struct DeliveryLoop<E, P> {
    recv: EventBusSocket<E, P>,
    document: Arc<Document<E, P>>,
}

impl<E, P> DeliveryLoop<E, P> {
    pub fn new(socket: EventBusSocket<E, P>, document: Arc<Document<E, P>>) -> Self {
        DeliveryLoop {
            recv: socket,
            document,
        }
    }

    pub async fn deliver_once(&mut self) -> Option<Flow> {
        let envelope = self.recv.recv().await?;
        if self.document.listener_count(&envelope.name) == 0 {
            tracing::warn!(event_name = %envelope.name, "got event nobody listens to");
        }

        Some(
            self.document
                .fire(&envelope.name, &envelope.event, &envelope.payload),
        )
    }

    pub async fn run(&mut self) {
        while self.deliver_once().await.is_some() {}
        tracing::debug!("event bus closed, delivery loop finished");
    }
}
