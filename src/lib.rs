/// async delivery of published events into a document
pub mod delivery;
/// the in-process document: event source & location
pub mod document;
pub mod error;
/// ports & sockets for publishing events from other tasks
pub mod event_bus;
/// handlers, route patterns & the prefix router
pub mod events;
/// builder wiring an event bus to a document
pub mod host;
/// attach & release listeners
pub mod listener;
pub mod location;

pub use document::{Document, EventSource};
pub use error::{Error, Result, RouteError, SubscriptionError};
pub use events::{null_handler, EventMux, Flow, Handler, HandlerFn, NullHandler, RoutePattern};
pub use listener::{listen, Subscription};
pub use location::{Location, LocationError};
