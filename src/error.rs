use payloads::ErrorKind;
use thiserror::Error;

pub const VOTE_FALLBACK: &str = "Failed to vote";
pub const FEED_FALLBACK: &str = "Failed to fetch bookmarks";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        kind: Option<ErrorKind>,
        message: String,
    },
}

impl ClientError {
    /// Text to show the user: the server's message when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ClientError::Rejected { kind, .. } => *kind,
            ClientError::Transport(_) => None,
        }
    }
}
