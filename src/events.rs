pub use event_mux_core::{null_handler, Flow, Handler, HandlerFn, NullHandler};

pub mod pattern;
pub mod router;

pub use pattern::RoutePattern;
pub use router::EventMux;
