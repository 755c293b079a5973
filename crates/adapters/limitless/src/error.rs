//! Bridge adapter error types.

use lumen_domain::error::{InvalidArgument, LumenError};

/// Errors specific to the LimitlessLED adapter.
#[derive(Debug, thiserror::Error)]
pub enum LimitlessError {
    /// The bridge host name resolved to no address.
    #[error("can't resolve bridge address {host}:{port}")]
    Unresolved { host: String, port: u16 },

    /// The UDP socket failed.
    #[error("UDP transport error")]
    Io(#[from] std::io::Error),

    /// A command operand is outside what the bridge accepts.
    #[error("invalid argument")]
    InvalidArgument(#[from] InvalidArgument),
}

impl LimitlessError {
    /// Convert into a [`LumenError`] for propagation across port boundaries.
    ///
    /// Argument errors keep their own variant; everything else is a
    /// [`LumenError::Transport`].
    #[must_use]
    pub fn into_domain(self) -> LumenError {
        match self {
            Self::InvalidArgument(err) => err.into(),
            other => LumenError::Transport(Box::new(other)),
        }
    }
}

impl From<LimitlessError> for LumenError {
    fn from(err: LimitlessError) -> Self {
        err.into_domain()
    }
}
