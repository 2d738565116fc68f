//! Database settings and the `TEST` sub-settings mapping.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// `TEST` key for the database encoding.
pub const CHARSET: &str = "CHARSET";
/// `TEST` key for the template database to copy from.
pub const TEMPLATE: &str = "TEMPLATE";
/// `TEST` key for the database collation.
pub const COLLATION: &str = "COLLATION";
/// `TEST` key for an explicit test database name.
pub const NAME: &str = "NAME";
/// `TEST` key naming the alias this database mirrors.
pub const MIRROR: &str = "MIRROR";

/// Default engine identifier.
pub const DEFAULT_ENGINE: &str = "postgresql";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5432;

/// The `TEST` settings mapping.
///
/// A key can be absent, present with a null value, or present with a string
/// value. The first two are distinct states: restoring an overlay puts back
/// exactly the state that was there before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSettings {
    values: BTreeMap<String, Option<String>>,
}

impl Default for TestSettings {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        for key in [CHARSET, COLLATION, NAME, MIRROR] {
            values.insert(key.to_string(), None);
        }
        Self { values }
    }
}

impl TestSettings {
    /// Create the default mapping (`CHARSET`, `COLLATION`, `NAME` and
    /// `MIRROR` present and null, `TEMPLATE` absent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapping with no keys at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Set a key to a string value.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), Some(value.into()));
        self
    }

    /// Set a key to null.
    #[must_use]
    pub fn with_null(mut self, key: impl Into<String>) -> Self {
        self.values.insert(key.into(), None);
        self
    }

    /// Set the encoding.
    #[must_use]
    pub fn with_charset(self, charset: impl Into<String>) -> Self {
        self.with_value(CHARSET, charset)
    }

    /// Set the template database.
    #[must_use]
    pub fn with_template(self, template: impl Into<String>) -> Self {
        self.with_value(TEMPLATE, template)
    }

    /// Set the collation.
    #[must_use]
    pub fn with_collation(self, collation: impl Into<String>) -> Self {
        self.with_value(COLLATION, collation)
    }

    /// Set an explicit test database name.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_value(NAME, name)
    }

    /// Look up a key.
    ///
    /// Returns `None` when the key is absent and `Some(None)` when it is
    /// present but null.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.values.get(key).map(Option::as_deref)
    }

    /// Check whether a key is present (null or not).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Insert a key, returning the previous entry if there was one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Option<String>,
    ) -> Option<Option<String>> {
        self.values.insert(key.into(), value)
    }

    /// Remove a key, returning the previous entry if there was one.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.values.remove(key)
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of keys present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a key if it is set to a non-empty string.
    ///
    /// Absent, null and empty values all count as unset.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten().filter(|v| !v.is_empty())
    }

    /// Configured encoding.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.value(CHARSET)
    }

    /// Configured template database.
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.value(TEMPLATE)
    }

    /// Configured collation.
    #[must_use]
    pub fn collation(&self) -> Option<&str> {
        self.value(COLLATION)
    }

    /// Configured test database name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.value(NAME)
    }

    /// Alias this database mirrors, if any.
    #[must_use]
    pub fn mirror(&self) -> Option<&str> {
        self.value(MIRROR)
    }
}

/// Settings for one database alias.
///
/// This struct is marked `#[non_exhaustive]`; use [`DatabaseSettings::default()`]
/// or [`DatabaseSettings::from_connection_string()`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DatabaseSettings {
    /// Backend engine identifier.
    pub engine: String,

    /// Database name.
    pub name: Option<String>,

    /// Login role.
    pub user: Option<String>,

    /// Login password.
    pub password: Option<String>,

    /// Server hostname, IP address or socket directory.
    pub host: String,

    /// Server port (default: 5432).
    pub port: u16,

    /// Settings used when creating the test database.
    pub test: TestSettings,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            name: None,
            user: None,
            password: None,
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            test: TestSettings::default(),
        }
    }
}

impl DatabaseSettings {
    /// Create settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a libpq-style keyword/value connection string.
    ///
    /// ```text
    /// host=localhost port=5432 dbname=app user=postgres password='s3cr et'
    /// ```
    ///
    /// Values may be single-quoted; a backslash escapes the next character.
    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        let mut settings = Self::default();

        for (key, value) in parse_pairs(conn_str)? {
            match key.to_lowercase().as_str() {
                "host" | "hostaddr" => settings.host = value,
                "port" => {
                    settings.port = value
                        .parse()
                        .map_err(|_| Error::Config(format!("invalid port: {value}")))?;
                }
                "dbname" => settings.name = Some(value),
                "user" => settings.user = Some(value),
                "password" => settings.password = Some(value),
                other => {
                    // Ignore unknown options for forward compatibility
                    tracing::debug!(key = other, "ignoring unknown connection string option");
                }
            }
        }

        Ok(settings)
    }

    /// Set the engine identifier.
    #[must_use]
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Set the database name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the login role.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the login password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the server host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replace the `TEST` mapping.
    #[must_use]
    pub fn test(mut self, test: TestSettings) -> Self {
        self.test = test;
        self
    }
}

fn parse_pairs(conn_str: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut chars = conn_str.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if key.is_empty() || chars.next() != Some('=') {
            return Err(Error::Config(format!("invalid key-value near {key:?}")));
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if_eq(&'\'').is_some() {
            loop {
                match chars.next() {
                    Some('\'') => break,
                    Some('\\') if chars.peek().is_some() => {
                        if let Some(escaped) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    Some(c) if c != '\\' => value.push(c),
                    _ => {
                        return Err(Error::Config(format!(
                            "unterminated quoted value for {key}"
                        )));
                    }
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                } else {
                    value.push(c);
                }
            }
        }

        pairs.push((key, value));
    }

    Ok(pairs)
}
