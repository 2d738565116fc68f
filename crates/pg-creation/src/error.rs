//! Creation error types.

use thiserror::Error;

/// Errors that can occur while building test database statements.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A test setting is present that PostgreSQL cannot honor.
    #[error("unsupported setting {key}: {reason}")]
    UnsupportedSetting {
        /// Settings key, e.g. `COLLATION`.
        key: String,
        /// Why the setting is rejected.
        reason: String,
    },

    /// Invalid identifier (empty or containing a NUL byte).
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

impl Error {
    /// Check if this error was caused by the settings rather than by
    /// a malformed name.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnsupportedSetting { .. })
    }
}

/// Result type for creation operations.
pub type Result<T> = std::result::Result<T, Error>;
