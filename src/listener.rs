use std::sync::Arc;

use crate::{
    document::{Callback, EventSource, ListenerToken},
    error::SubscriptionError,
    events::Handler,
};

/// Attaches `handler` to `source` for every firing of `event_name`.
///
/// The returned [`Subscription`] must be released with
/// [`Subscription::unlisten`]; dropping it leaves the listener attached.
pub fn listen<E, P, H>(
    source: Arc<dyn EventSource<E, P>>,
    event_name: &str,
    handler: H,
) -> Subscription<E, P>
where
    E: 'static,
    P: 'static,
    H: Handler<E, P> + 'static,
{
    tracing::debug!(event_name, "adding event listener");

    let callback: Callback<E, P> =
        Arc::new(move |event: &E, payload: &P| handler.handle_event(event, payload));
    let token = source.subscribe(event_name, callback);

    Subscription {
        source,
        event_name: event_name.to_owned(),
        token,
        detached: false,
    }
}

/// An active binding of a handler to a named event.
pub struct Subscription<E, P> {
    source: Arc<dyn EventSource<E, P>>,
    event_name: String,
    token: ListenerToken,
    detached: bool,
}

impl<E, P> Subscription<E, P> {
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Detaches the listener. Events delivered after this returns no longer
    /// reach the handler.
    pub fn unlisten(&mut self) -> Result<(), SubscriptionError> {
        if self.detached {
            return Err(SubscriptionError::AlreadyDetached(self.event_name.clone()));
        }

        if !self.source.unsubscribe(self.token) {
            tracing::warn!(event_name = %self.event_name, "listener was already gone from its source");
        }
        self.detached = true;
        tracing::debug!(event_name = %self.event_name, "removed event listener");
        Ok(())
    }
}

impl<E, P> Drop for Subscription<E, P> {
    fn drop(&mut self) {
        if !self.detached {
            tracing::debug!(event_name = %self.event_name, "subscription dropped while still attached");
        }
    }
}

impl<E, P> std::fmt::Debug for Subscription<E, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event_name", &self.event_name)
            .field("token", &self.token)
            .field("detached", &self.detached)
            .finish()
    }
}
