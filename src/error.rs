use thiserror::Error;

use crate::location::LocationError;

pub type Result<T> = std::result::Result<T, Error>;

/// Wiring mistakes made while building the routing table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("eventmux: invalid empty pattern")]
    EmptyPattern,

    #[error("eventmux: missing handler for pattern {0:?}")]
    MissingHandler(String),

    #[error("eventmux: multiple registrations for {0:?}")]
    Duplicate(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("listener for {0:?} already detached")]
    AlreadyDetached(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    #[error("failed to resolve uri: {0}")]
    Location(#[from] LocationError),
}
