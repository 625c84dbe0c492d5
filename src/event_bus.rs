use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

/// A named event waiting to be delivered to the document.
#[derive(Debug, Clone)]
pub struct Envelope<E, P> {
    pub name: String,
    pub event: E,
    pub payload: P,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("event bus is full, dropped {0:?}")]
    Full(String),

    #[error("event bus is closed, dropped {0:?}")]
    Closed(String),
}

pub struct EventBusPort<E, P>(mpsc::Sender<Envelope<E, P>>);

impl<E, P> Clone for EventBusPort<E, P> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<E, P> EventBusPort<E, P> {
    pub(crate) fn new(tx: mpsc::Sender<Envelope<E, P>>) -> Self {
        Self(tx)
    }

    pub fn publish(&self, name: impl Into<String>, event: E, payload: P) -> Result<(), BusError> {
        let envelope = Envelope {
            name: name.into(),
            event,
            payload,
        };

        self.0.try_send(envelope).map_err(|err| match err {
            TrySendError::Full(envelope) => BusError::Full(envelope.name),
            TrySendError::Closed(envelope) => BusError::Closed(envelope.name),
        })
    }
}

pub struct EventBusSocket<E, P>(mpsc::Receiver<Envelope<E, P>>);

impl<E, P> EventBusSocket<E, P> {
    pub async fn recv(&mut self) -> Option<Envelope<E, P>> {
        self.0.recv().await
    }
}

pub(crate) fn create<E, P>(size: usize) -> (EventBusPort<E, P>, EventBusSocket<E, P>) {
    let (tx, rx) = mpsc::channel(size);
    (EventBusPort::new(tx), EventBusSocket(rx))
}
