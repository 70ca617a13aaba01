use thiserror::Error;

/// Errors surfaced by the client. Every variant is fatal for the operation that raised it.
#[derive(Error, Debug)]
pub enum XbrlError {
    /// Missing credential or unusable settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote service answered with an error status or a non-XML body
    #[error("Transport error (status {status}): {message}")]
    Transport { status: u16, message: String },

    /// Connection-level failure from the HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body is not well-formed XML
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request rejected before dispatch
    #[error("Request validation failed: {0}")]
    Validation(String),
}

impl XbrlError {
    pub fn config(message: impl Into<String>) -> Self {
        XbrlError::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        XbrlError::Validation(message.into())
    }

    /// HTTP status carried by a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            XbrlError::Transport { status, .. } => Some(*status),
            XbrlError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<roxmltree::Error> for XbrlError {
    fn from(e: roxmltree::Error) -> Self {
        XbrlError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, XbrlError>;
