//! Test fixture utilities.

use pg_creation::{Connection, DatabaseSettings, TestSettings};

/// Connection fixture for tests that exercise creation helpers.
#[derive(Debug, Clone)]
pub struct TestFixture {
    /// Connection alias.
    pub alias: String,
    /// Settings the connection is created with.
    pub settings: DatabaseSettings,
}

impl TestFixture {
    /// Create a fixture for a database called `database` with default
    /// `TEST` settings.
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            alias: "default".to_string(),
            settings: DatabaseSettings::new().name(database),
        }
    }

    /// Create a fixture from a libpq connection string.
    ///
    /// `database` is used when the string does not name a database.
    pub fn from_connection_string(
        database: impl Into<String>,
        conn_str: &str,
    ) -> pg_creation::Result<Self> {
        let settings = DatabaseSettings::from_connection_string(conn_str)?;
        let settings = if settings.name.is_some() {
            settings
        } else {
            settings.name(database)
        };
        tracing::trace!(
            host = %settings.host,
            port = settings.port,
            name = ?settings.name,
            "fixture settings parsed"
        );

        Ok(Self {
            alias: "default".to_string(),
            settings,
        })
    }

    /// Set the connection alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Replace the `TEST` mapping.
    #[must_use]
    pub fn with_test_settings(mut self, test: TestSettings) -> Self {
        self.settings.test = test;
        self
    }

    /// Build the connection.
    #[must_use]
    pub fn connection(&self) -> Connection {
        Connection::new(self.alias.clone(), self.settings.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_defaults() {
        let conn = TestFixture::new("app").connection();
        assert_eq!(conn.alias(), "default");
        assert_eq!(conn.settings().name.as_deref(), Some("app"));
        assert_eq!(conn.test_settings(), TestSettings::default());
    }

    #[test]
    fn test_fixture_builder() {
        let conn = TestFixture::new("app")
            .with_alias("other")
            .with_test_settings(TestSettings::empty().with_template("template0"))
            .connection();
        assert_eq!(conn.alias(), "other");
        assert_eq!(conn.test_settings().template(), Some("template0"));
        assert_eq!(conn.test_settings().len(), 1);
    }

    #[test]
    fn test_fixture_from_connection_string_keeps_dbname() {
        let fixture =
            TestFixture::from_connection_string("fallback", "host=db.internal dbname=shop")
                .unwrap();
        assert_eq!(fixture.settings.host, "db.internal");
        assert_eq!(fixture.settings.name.as_deref(), Some("shop"));
        assert_eq!(fixture.alias, "default");
    }

    #[test]
    fn test_fixture_from_connection_string_without_dbname() {
        let fixture =
            TestFixture::from_connection_string("app", "host=db.internal port=6432").unwrap();
        assert_eq!(fixture.settings.port, 6432);
        assert_eq!(fixture.settings.name.as_deref(), Some("app"));
        assert_eq!(fixture.settings.test, TestSettings::default());
    }

    #[test]
    fn test_fixture_from_connection_string_invalid() {
        let result = TestFixture::from_connection_string("app", "port=not-a-port");
        assert!(matches!(result, Err(pg_creation::Error::Config(_))));

        let result = TestFixture::from_connection_string("app", "password='unterminated");
        assert!(result.is_err());
    }
}
