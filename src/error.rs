//! Error types
//!
//! Only content loading can fail at runtime. Everything else in the simulation
//! is an invariant and is checked with debug assertions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A level catalog, level index, or stored blob could not be provided.
    /// Callers recover by falling back to built-in defaults.
    #[error("Resource unavailable: {resource} ({reason})")]
    ResourceUnavailable { resource: String, reason: String },
}

impl SimError {
    pub fn unavailable(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::unavailable("json", err)
    }
}
