//! Failures of a single send.

use thiserror::Error;

/// Why a message did not produce an assistant reply.
#[derive(Error, Debug)]
pub enum SendError {
    /// The backend answered with a non-2xx status.
    #[error("API error: {status_text}")]
    Network {
        /// HTTP status code.
        status: u16,
        /// Reason phrase shown to the user.
        status_text: String,
    },

    /// The backend answered 2xx without a usable `reply`.
    #[error("No response from assistant")]
    Protocol,

    /// The request never completed (connection refused, timeout, ...).
    #[error("request to chat backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Another send on the same session has not resolved yet.
    #[error("A reply is already on its way.")]
    Busy,
}

impl SendError {
    /// Text for the error notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Failed to send message. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = SendError::Network {
            status: 500,
            status_text: "Internal Server Error".into(),
        };
        assert_eq!(err.user_message(), "API error: Internal Server Error");
        assert_eq!(
            SendError::Protocol.user_message(),
            "No response from assistant"
        );
        assert_eq!(
            SendError::Busy.user_message(),
            "A reply is already on its way."
        );
    }
}
