use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Backend rejected the request")]
    Backend { messages: Vec<String> },

    #[error("Malformed response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn backend<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Backend {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// First human-readable message carried by the error payload, if any.
    ///
    /// Backend failures carry a message list; the first non-empty entry wins.
    /// Transport failures expose their own description. Everything else
    /// yields nothing and callers fall back to a generic message.
    pub fn first_message(&self) -> Option<&str> {
        match self {
            Self::Backend { messages } => {
                messages.iter().map(|m| m.trim()).find(|m| !m.is_empty())
            }
            Self::Transport(message) if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn first_message_takes_first_non_empty_backend_entry() {
        let error = ApiError::backend(["", "  ", "dataset is locked", "second"]);
        assert_eq!(error.first_message(), Some("dataset is locked"));
    }

    #[test]
    fn first_message_falls_back_to_none_for_empty_payload() {
        let error = ApiError::backend(Vec::<String>::new());
        assert_eq!(error.first_message(), None);

        let error = ApiError::InvalidResponse("truncated body".into());
        assert_eq!(error.first_message(), None);
    }

    #[test]
    fn first_message_uses_transport_description() {
        let error = ApiError::transport("connection refused");
        assert_eq!(error.first_message(), Some("connection refused"));
    }
}
