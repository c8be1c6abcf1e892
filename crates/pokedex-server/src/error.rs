//! Error types and handling for the server binary
//!
//! Failures here happen before or around serving: reading configuration,
//! binding the listener, installing the subscriber. Request-level failures
//! never surface as this type; they map to status codes in `routes`.

use std::io;
use std::path::PathBuf;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the server binary
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, listener binding, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from pokedex-core
    #[error("Core error: {0}")]
    Core(#[from] pokedex_core::Error),

    /// Configuration file does not exist
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The HTTP server stopped with an error
    #[error("Server error: {0}")]
    Server(String),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Config(_) => 5,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Server(_) => 20,
            Self::Other { .. } => 99,
        }
    }
}

/// Format an error for display on stderr
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = vec![
            Error::Io(io::Error::new(io::ErrorKind::Other, "boom")),
            Error::Core(pokedex_core::Error::configuration("bad locale")),
            Error::FileNotFound {
                path: PathBuf::from("missing.yaml"),
            },
            Error::config("bad"),
            Error::Server("closed".to_string()),
            Error::other("misc"),
        ];

        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        assert!(codes.iter().all(|code| *code != 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_error() {
        let error = Error::config("unknown log format 'xml'");
        assert_eq!(
            format_error(&error, false),
            "Error: Configuration error: unknown log format 'xml'"
        );

        colored::control::set_override(true);
        let colored = format_error(&error, true);
        assert!(colored.starts_with("\u{1b}["));
        assert!(colored.ends_with("Configuration error: unknown log format 'xml'"));
    }
}
