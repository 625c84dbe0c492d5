use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("no active document location")]
    Unavailable,
}

/// Reports the URI of the currently active document.
pub trait Location: Send + Sync {
    fn current_uri(&self) -> Result<String, LocationError>;
}

/// A location pinned to a single URI.
#[derive(Debug, Clone)]
pub struct FixedLocation(String);

impl FixedLocation {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }
}

impl Location for FixedLocation {
    fn current_uri(&self) -> Result<String, LocationError> {
        Ok(self.0.clone())
    }
}
