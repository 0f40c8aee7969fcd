use thiserror::Error;

/// Broad failure category, for callers that branch on the kind of failure
/// rather than on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Validation,
    Transport,
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("Invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to exchange token assertion: {0}")]
    TokenExchange(String),

    #[error("Failed to retrieve access token.")]
    MissingAccessToken,

    #[error("FCM \"data\" must be an associative array.")]
    NonAssociativeData,

    #[error("Icon \"{0}\" is not an absolute URL and no asset base URL is configured.")]
    InvalidIcon(String),

    #[error("Failed to serialize FCM payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP transport error: {0}")]
    Transport(String),
}

impl SendError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SendError::InvalidCredentials(_)
            | SendError::Signing(_)
            | SendError::TokenExchange(_)
            | SendError::MissingAccessToken => ErrorKind::Auth,
            SendError::NonAssociativeData
            | SendError::InvalidIcon(_)
            | SendError::Serialization(_) => ErrorKind::Validation,
            SendError::Transport(_) => ErrorKind::Transport,
        }
    }
}

pub type Result<T> = std::result::Result<T, SendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_documented_texts() {
        assert_eq!(
            SendError::MissingAccessToken.to_string(),
            "Failed to retrieve access token."
        );
        assert_eq!(
            SendError::NonAssociativeData.to_string(),
            r#"FCM "data" must be an associative array."#
        );
        assert_eq!(
            SendError::Transport("connection refused".into()).to_string(),
            "HTTP transport error: connection refused"
        );
    }

    #[test]
    fn kinds() {
        assert_eq!(SendError::MissingAccessToken.kind(), ErrorKind::Auth);
        assert_eq!(
            SendError::TokenExchange("dns".into()).kind(),
            ErrorKind::Auth
        );
        assert_eq!(SendError::NonAssociativeData.kind(), ErrorKind::Validation);
        assert_eq!(
            SendError::InvalidIcon("a.png".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(SendError::Transport("x".into()).kind(), ErrorKind::Transport);
    }
}
