//! Error types for pub-release

use thiserror::Error;

/// Errors that can abort a pipeline or labeling run
#[derive(Debug, Error)]
pub enum Error {
    /// A required workflow input was not supplied
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    /// A workflow input or runner variable has an unusable value
    #[error("configuration error: {0}")]
    Config(String),

    /// No forge token could be found
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Changelog could not be normalized or parsed
    #[error("changelog error: {0}")]
    Changelog(String),

    /// GitHub API error with context
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error surfaced by octocrab
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Raw HTTP failure (downloads, endpoints not covered by octocrab)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Platform API error (generic, used by test doubles)
    #[error("platform error: {0}")]
    Platform(String),

    /// An external program exited unsuccessfully
    #[error("command `{program}` failed with exit code {code}: {stderr}")]
    CommandFailed {
        /// Program that was run
        program: String,
        /// Exit code (-1 when terminated by a signal)
        code: i32,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// Toolchain download, extraction or caching failed
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// Zip archive could not be read
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Quality score report could not be read
    #[error("quality report error: {0}")]
    QualityReport(String),

    /// Quality score below the configured minimum
    #[error(
        "Pub score test failed. Achieved score of {granted} is less than expected minimum score of {minimum}"
    )]
    QualityGate {
        /// Points granted by the scorer
        granted: i64,
        /// Configured minimum
        minimum: i64,
    },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
