//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LumenError`]
//! via `#[from]`, so the command processor can report every failure through a
//! single type.

/// Top-level error for anything that can go wrong while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    /// A setting value was rejected (range, color, black).
    #[error("invalid argument")]
    InvalidArgument(#[from] InvalidArgument),

    /// No known bridge driver claims a region's configuration.
    #[error("no driver found")]
    NoDriverFound(#[from] NoDriverFound),

    /// A sequence element is neither a patch nor a known command.
    #[error("invalid sequence step")]
    InvalidSequenceStep(#[from] InvalidSequenceStep),

    /// The payload is neither a settings patch nor a sequence.
    #[error("unknown request: {0}")]
    UnknownRequest(String),

    /// A region or zone is not configured.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The request body could not be decoded.
    #[error("malformed payload")]
    MalformedPayload(#[from] serde_json::Error),

    /// The command processor is no longer accepting requests.
    #[error("command processor unavailable")]
    Unavailable,

    /// Sending to the bridge failed.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LumenError {
    /// Render the error and its sources as `outer: inner: …`.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}

/// Rejected setting values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    #[error("brightness must be an integer between 2 and 27, got {0}")]
    Brightness(i64),

    #[error("unknown color {0:?}")]
    UnparseableColor(String),

    #[error("can't set the color to black; set power=false instead")]
    BlackColor,

    #[error("zone must be an integer between 0 and 4, got {0:?}")]
    Zone(String),
}

/// No driver claimed the configuration of a region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no driver handles region {region:?} of type {driver:?}")]
pub struct NoDriverFound {
    pub region: String,
    pub driver: String,
}

/// A malformed sequence element, kept as its JSON rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised step {step}")]
pub struct InvalidSequenceStep {
    pub step: String,
}

/// A configured thing was looked up and is missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} not found")]
pub struct NotFoundError {
    /// The kind of thing, e.g. `"Region"` or `"Zone"`.
    pub entity: &'static str,
    pub id: String,
}
