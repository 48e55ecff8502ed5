use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid pattern {pattern:?} in rule table '{table}': {source}")]
    InvalidPattern {
        table: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, CleanerError>;
