//! Error types for HTTP reachability probing.
//!
//! Per-candidate network failures are deliberately not represented here: a
//! candidate that cannot be reached is a normal [`ProbeResult`] with
//! `reachable == false`, not an error. This type covers configuration
//! problems and pipeline faults only.
//!
//! [`ProbeResult`]: crate::ProbeResult

use std::fmt;

/// Errors that can occur while configuring or running a probe pipeline.
#[derive(Debug, Clone)]
pub enum HttpCheckError {
    /// Invalid configuration value or unparseable configuration file.
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// A file could not be read (configuration file or domain input file).
    FileError {
        /// Path to the offending file
        path: String,
        /// What went wrong
        message: String,
    },

    /// Internal pipeline fault, e.g. a worker task that panicked.
    InternalError {
        /// Description of the fault
        message: String,
    },
}

impl HttpCheckError {
    /// Create a configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        HttpCheckError::ConfigError {
            message: message.into(),
        }
    }

    /// Create a file error with the path that failed.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        HttpCheckError::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        HttpCheckError::InternalError {
            message: message.into(),
        }
    }
}

impl fmt::Display for HttpCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpCheckError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            HttpCheckError::FileError { path, message } => {
                write!(f, "File error for '{}': {}", path, message)
            }
            HttpCheckError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for HttpCheckError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = HttpCheckError::config("concurrency must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: concurrency must be positive"
        );
    }

    #[test]
    fn test_file_error_display() {
        let err = HttpCheckError::file_error("/tmp/domains.txt", "permission denied");
        assert_eq!(
            err.to_string(),
            "File error for '/tmp/domains.txt': permission denied"
        );
    }

    #[test]
    fn test_internal_error_display() {
        let err = HttpCheckError::internal("worker task panicked");
        assert_eq!(err.to_string(), "Internal error: worker task panicked");
    }

    #[test]
    fn test_constructors_accept_string_types() {
        let from_str = HttpCheckError::config("bad value");
        let from_string = HttpCheckError::config(String::from("bad value"));
        assert_eq!(from_str.to_string(), from_string.to_string());
    }
}
