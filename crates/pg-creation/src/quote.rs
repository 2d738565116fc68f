//! Identifier and literal quoting.

use crate::error::{Error, Result};

/// Maximum identifier length PostgreSQL keeps (`NAMEDATALEN - 1`).
/// Longer names are truncated by the server.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Quote an identifier with double quotes.
///
/// Names that are already wrapped in double quotes are returned unchanged.
/// Embedded double quotes are doubled.
#[must_use]
pub fn quote_name(name: &str) -> String {
    if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
        return name.to_string();
    }
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal with single quotes, doubling embedded quotes.
#[must_use]
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Reject identifiers the server can never accept.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\0') {
        return Err(Error::InvalidIdentifier(name.to_string()));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        tracing::warn!(
            name = name,
            max = MAX_IDENTIFIER_LEN,
            "identifier exceeds server limit and will be truncated"
        );
    }
    Ok(())
}
