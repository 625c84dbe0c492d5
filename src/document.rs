use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use parking_lot::RwLock;

use crate::{
    events::Flow,
    location::{Location, LocationError},
};

pub type Callback<E, P> = Arc<dyn Fn(&E, &P) -> Flow + Send + Sync>;

/// Identifies one subscription on an [`EventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

/// Something that delivers named events to subscribed callbacks.
pub trait EventSource<E, P>: Send + Sync {
    fn subscribe(&self, event_name: &str, callback: Callback<E, P>) -> ListenerToken;

    /// Returns false when the token was not subscribed.
    fn unsubscribe(&self, token: ListenerToken) -> bool;
}

struct Registered<E, P> {
    token: ListenerToken,
    event_name: String,
    callback: Callback<E, P>,
}

/// In-process document: an event source plus the location it currently shows.
pub struct Document<E, P> {
    next_token: AtomicU64,
    listeners: RwLock<Vec<Registered<E, P>>>,
    href: RwLock<Option<String>>,
}

impl<E, P> Default for Document<E, P> {
    fn default() -> Self {
        Self {
            next_token: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
            href: RwLock::new(None),
        }
    }
}

impl<E, P> Document<E, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_href(href: impl Into<String>) -> Self {
        let doc = Self::default();
        doc.navigate(href);
        doc
    }

    pub fn navigate(&self, href: impl Into<String>) {
        *self.href.write() = Some(href.into());
    }

    pub fn listener_count(&self, event_name: &str) -> usize {
        self.listeners
            .read()
            .iter()
            .filter(|l| l.event_name == event_name)
            .count()
    }

    /// Delivers the event to every listener bound to `event_name`, in the order
    /// they subscribed. Suppressed if any listener asked for it.
    pub fn fire(&self, event_name: &str, event: &E, payload: &P) -> Flow {
        // Snapshot so listeners can unsubscribe while being called.
        let callbacks: Vec<Callback<E, P>> = self
            .listeners
            .read()
            .iter()
            .filter(|l| l.event_name == event_name)
            .map(|l| l.callback.clone())
            .collect();

        if callbacks.is_empty() {
            tracing::trace!(event_name, "no listeners");
        }

        callbacks
            .iter()
            .fold(Flow::Continue, |flow, callback| {
                match (callback)(event, payload) {
                    Flow::Suppress => Flow::Suppress,
                    Flow::Continue => flow,
                }
            })
    }
}

impl<E, P> EventSource<E, P> for Document<E, P> {
    fn subscribe(&self, event_name: &str, callback: Callback<E, P>) -> ListenerToken {
        let token = ListenerToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push(Registered {
            token,
            event_name: event_name.to_owned(),
            callback,
        });
        token
    }

    fn unsubscribe(&self, token: ListenerToken) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| l.token != token);
        listeners.len() != before
    }
}

impl<E, P> Location for Document<E, P> {
    fn current_uri(&self) -> Result<String, LocationError> {
        self.href.read().clone().ok_or(LocationError::Unavailable)
    }
}
