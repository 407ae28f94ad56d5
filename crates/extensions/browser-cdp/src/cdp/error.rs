//! Errors raised while talking to Chrome over the DevTools protocol.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    #[error("cannot reach DevTools endpoint: {0}")]
    ConnectionFailed(String),

    #[error("no debuggable Chrome at {0}; start it with --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("socket: {0}")]
    WebSocket(String),

    /// Error object returned by the browser for a command.
    #[error("protocol error {code}: {message}")]
    Protocol { code: i64, message: String },

    #[error("bad JSON on the wire: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("discovery request failed: {0}")]
    Http(String),

    #[error("navigation to {0} failed")]
    NavigationFailed(String),

    /// Exception thrown inside the page.
    #[error("page script threw: {0}")]
    JavaScript(String),

    #[error("{0} timed out")]
    Timeout(String),

    #[error("DevTools session closed")]
    SessionClosed,

    #[error("unexpected reply: {0}")]
    InvalidResponse(String),
}

const LOST_CONTEXT_MARKERS: [&str; 4] = [
    "context was destroyed",
    "cannot find context",
    "target closed",
    "session with given id not found",
];

impl CdpError {
    /// The page's JavaScript context or target no longer exists.
    pub fn is_context_lost(&self) -> bool {
        match self {
            CdpError::SessionClosed | CdpError::WebSocket(_) => true,
            CdpError::Protocol { message, .. } => {
                let lower = message.to_lowercase();
                LOST_CONTEXT_MARKERS.iter().any(|m| lower.contains(m))
            }
            _ => false,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        Self::ConnectionFailed(format!("malformed URL ({})", e))
    }
}
