//! Error types for the room dashboard

/// Errors that can occur in the room dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Realtime error: {0}")]
    Realtime(String),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Result type alias for room dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
