use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Data source '{name}' unavailable: {reason}")]
    SourceUnavailable { name: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config '{path}': {reason}")]
    Config { path: String, reason: String },
}

impl ReportError {
    pub fn unavailable(name: impl Into<String>, reason: impl ToString) -> Self {
        ReportError::SourceUnavailable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
