use thiserror::Error;

/// Failures reported by a [`DataSource`](crate::DataSource) lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The caller abandoned the request through its cancellation token.
    #[error("lookup was cancelled")]
    Cancelled,

    /// The lookup reached the source but could not be completed.
    #[error("lookup failed: {message}")]
    Transport { message: String },
}

impl SourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_is_displayed() {
        let err = SourceError::transport("connection reset");
        assert_eq!(err.to_string(), "lookup failed: connection reset");
        assert!(!err.is_cancelled());
        assert!(SourceError::Cancelled.is_cancelled());
    }
}
