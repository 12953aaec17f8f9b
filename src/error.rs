#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote answered with a non-success status or `success: false`.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("A draft is already open")]
    DraftOpen,

    #[error("No draft is open")]
    NoDraft,

    #[error("Unknown product field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ConsoleError {
    /// Message suitable for a user-facing alert.
    ///
    /// Remote errors surface the server's own message; everything else falls
    /// back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ConsoleError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
