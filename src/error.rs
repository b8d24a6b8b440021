use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for textswap
#[derive(Error, Debug)]
pub enum TextSwapError {
    #[error("Cannot open {}: {source}", .path.display())]
    ResourceNotFound {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("{} is not valid UTF-8 (first invalid byte at offset {valid_up_to})", .path.display())]
    Decode { path: PathBuf, valid_up_to: usize },

    #[error("Failed to write {}: {message}", .path.display())]
    Write { message: String, path: PathBuf },

    #[error("{}", format_rule_parse(.path, .message, .line))]
    RuleParse {
        message: String,
        path: PathBuf,
        line: Option<usize>,
    },

    #[error("Invalid rule: {message}")]
    InvalidRule { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

fn format_rule_parse(path: &Path, message: &str, line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(
            "Failed to parse rules in {} at line {}: {}",
            path.display(),
            line,
            message
        ),
        None => format!("Failed to parse rules in {}: {}", path.display(), message),
    }
}

impl TextSwapError {
    /// Create a new resource-not-found error for a path that could not be opened
    pub fn not_found(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::ResourceNotFound {
            source: err,
            path: path.into(),
        }
    }

    pub fn decode_error(path: impl Into<PathBuf>, valid_up_to: usize) -> Self {
        Self::Decode {
            path: path.into(),
            valid_up_to,
        }
    }

    /// Create a new write error
    pub fn write_error(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Write {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a new rule parse error, optionally pointing at a line of the rule file
    pub fn rule_parse(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        line: Option<usize>,
    ) -> Self {
        Self::RuleParse {
            message: message.into(),
            path: path.into(),
            line,
        }
    }

    pub fn invalid_rule(message: impl Into<String>) -> Self {
        Self::InvalidRule {
            message: message.into(),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type alias using TextSwapError
pub type TextSwapResult<T> = Result<T, TextSwapError>;

/// Contextual error mapping for writes
pub fn map_write_err<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> TextSwapError {
    let path = path.into();
    move |err| TextSwapError::write_error(err.to_string(), path)
}
