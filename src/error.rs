use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("`{command}` produced diagnostics: {stderr}")]
    QueryDiagnostic { command: String, stderr: String },

    #[error("Failed to parse output: {0}")]
    ParseError(String),

    #[error("Invalid commit date: {0}")]
    Date(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WebDriver error: {0}")]
    WebDriver(String),

    #[error("Issue tracker error: {0}")]
    IssueTracker(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors that only void a single metric rather than the whole record.
    pub fn is_query_failure(&self) -> bool {
        matches!(
            self,
            Error::Git(_)
                | Error::QueryDiagnostic { .. }
                | Error::ParseError(_)
                | Error::Date(_)
                | Error::Walk(_)
        )
    }
}
