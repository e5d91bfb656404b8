//! Error taxonomy shared by the loader, parser and pipelines.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("{message}")]
    DataUnavailable {
        message: String,
        attempts: Vec<String>,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn network(url: &str, message: impl ToString) -> Self {
        DashboardError::Network {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether the loader should move on to the next source after this error.
    ///
    /// Parse errors are fatal: another copy of the same file has the same header.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::Network { .. }
                | DashboardError::Json(_)
                | DashboardError::InvalidPayload(_)
                | DashboardError::Io(_)
        )
    }
}

/// Fatal problems found while reading delimited text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Data file is missing the required column \"{column}\"")]
    MissingColumn { column: String },

    #[error("Unreadable input at line {line}: {message}")]
    Malformed { line: u64, message: String },
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        ParseError::Malformed {
            line,
            message: err.to_string(),
        }
    }
}
