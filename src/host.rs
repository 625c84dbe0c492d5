use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::{
    delivery::DeliveryLoop,
    document::Document,
    event_bus::{EventBusPort, EventBusSocket},
};

/// Tracks the delivery loops spawned for documents.
#[derive(Default, Clone)]
pub struct DeliveryTasks(TaskTracker);

impl DeliveryTasks {
    pub fn new() -> Self {
        Self(TaskTracker::new())
    }

    fn spawn_delivery<E, P>(&self, mut delivery: DeliveryLoop<E, P>)
    where
        E: Send + 'static,
        P: Send + 'static,
    {
        self.0.spawn(async move { delivery.run().await });
        tracing::debug!(running = self.0.len(), "delivery loop spawned");
    }

    /// Number of delivery loops still draining their bus.
    pub fn running(&self) -> usize {
        self.0.len()
    }

    /// Stops accepting loops and waits for the running ones. A loop only
    /// finishes once every port of its bus has been dropped.
    pub async fn shutdown(&self) {
        self.0.close();
        self.0.wait().await;
        tracing::debug!("all delivery loops finished");
    }
}

/// Wires an event bus to a document. Configure, then `build`.
pub struct HostBuilder {
    channel_size: usize,
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self { channel_size: 10 }
    }
}

impl HostBuilder {
    pub fn with_channel_size(mut self, size: usize) -> Self {
        self.channel_size = size;
        self
    }

    pub fn channel_size(&self) -> usize {
        self.channel_size
    }

    pub fn build<E, P>(
        self,
        document: Arc<Document<E, P>>,
        tasks: &DeliveryTasks,
    ) -> (EventBusPort<E, P>, HostSetup<E, P>) {
        let (port, socket) = crate::event_bus::create(self.channel_size);
        let setup = HostSetup {
            socket,
            document,
            tasks: tasks.clone(),
        };

        (port, setup)
    }
}

pub struct HostSetup<E, P> {
    socket: EventBusSocket<E, P>,
    document: Arc<Document<E, P>>,
    tasks: DeliveryTasks,
}

impl<E, P> HostSetup<E, P>
where
    E: Send + 'static,
    P: Send + 'static,
{
    /// Spawns the delivery loop on the tracked task set.
    pub fn setup(self) {
        let delivery = DeliveryLoop::new(self.socket, self.document);
        self.tasks.spawn_delivery(delivery);
    }
}
