//! Test database creation statements.
//!
//! [`DatabaseCreation`] reads the connection's settings each time one of its
//! methods is called, so changes to the `TEST` mapping take effect at once.

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::quote::{quote_literal, quote_name, validate_identifier};
use crate::settings::{COLLATION, DatabaseSettings, NAME};

/// Prefix prepended to `NAME` when no explicit test name is configured.
pub const TEST_DATABASE_PREFIX: &str = "test_";

/// SQLSTATE raised by `CREATE DATABASE` when the database already exists.
pub const SQLSTATE_DUPLICATE_DATABASE: &str = "42P04";

/// Identity of a test database.
///
/// Two aliases with equal signatures would create the same database, so
/// only one of them needs to be set up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestDbSignature {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Backend engine.
    pub engine: String,
    /// Test database name.
    pub name: String,
}

/// What to do after `CREATE DATABASE` failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateFailure {
    /// The database exists and is being kept; carry on.
    Ignore,
    /// The database exists but must be dropped and created again.
    Recreate,
    /// Any other failure; abort the test run.
    Fatal,
}

impl CreateFailure {
    /// Classify a failed `CREATE DATABASE` by its SQLSTATE.
    #[must_use]
    pub fn classify(sqlstate: &str, keepdb: bool) -> Self {
        let failure = match (sqlstate == SQLSTATE_DUPLICATE_DATABASE, keepdb) {
            (true, true) => Self::Ignore,
            (true, false) => Self::Recreate,
            (false, _) => Self::Fatal,
        };
        tracing::debug!(sqlstate, keepdb, ?failure, "classified create failure");
        failure
    }
}

/// Build the `WITH ...` clause for `CREATE DATABASE`.
///
/// Returns an empty string when neither option is set. Empty strings count
/// as unset. `ENCODING` always precedes `TEMPLATE`.
#[must_use]
pub fn database_create_suffix(encoding: Option<&str>, template: Option<&str>) -> String {
    let mut suffix = String::new();
    if let Some(encoding) = encoding.filter(|e| !e.is_empty()) {
        suffix.push_str(" ENCODING ");
        suffix.push_str(&quote_literal(encoding));
    }
    if let Some(template) = template.filter(|t| !t.is_empty()) {
        suffix.push_str(" TEMPLATE ");
        suffix.push_str(&quote_name(template));
    }
    if suffix.is_empty() {
        suffix
    } else {
        format!("WITH{suffix}")
    }
}

/// PostgreSQL test database creation helpers bound to a connection.
#[derive(Debug, Clone, Copy)]
pub struct DatabaseCreation<'a> {
    connection: &'a Connection,
}

impl<'a> DatabaseCreation<'a> {
    /// Create helpers for `connection`.
    #[must_use]
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }

    /// Suffix appended to `CREATE DATABASE` for the test database.
    ///
    /// Built from `TEST.CHARSET` and `TEST.TEMPLATE`:
    ///
    /// ```text
    /// CHARSET=UTF8, TEMPLATE=template0  ->  WITH ENCODING 'UTF8' TEMPLATE "template0"
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedSetting`] if `TEST.COLLATION` is set;
    /// PostgreSQL cannot take a collation here. Returns
    /// [`Error::InvalidIdentifier`] if `TEST.TEMPLATE` is not a usable name.
    pub fn sql_table_creation_suffix(&self) -> Result<String> {
        let settings = self.connection.settings();
        table_creation_suffix(&settings)
    }

    /// Name of the test database: `TEST.NAME`, or `test_` + `NAME`.
    pub fn test_db_name(&self) -> Result<String> {
        let settings = self.connection.settings();
        test_db_name(&settings)
    }

    /// Full `CREATE DATABASE` statement for the test database.
    pub fn sql_create_test_db(&self) -> Result<String> {
        let settings = self.connection.settings();
        let name = test_db_name(&settings)?;
        let suffix = table_creation_suffix(&settings)?;

        let sql = if suffix.is_empty() {
            format!("CREATE DATABASE {}", quote_name(&name))
        } else {
            format!("CREATE DATABASE {} {suffix}", quote_name(&name))
        };
        tracing::debug!(alias = self.connection.alias(), sql = %sql, "built create statement");
        Ok(sql)
    }

    /// `DROP DATABASE` statement for the test database.
    pub fn sql_drop_test_db(&self) -> Result<String> {
        let settings = self.connection.settings();
        let name = test_db_name(&settings)?;
        Ok(format!("DROP DATABASE {}", quote_name(&name)))
    }

    /// Point the connection at its test database.
    ///
    /// Sets `NAME` and `TEST.NAME` to the test database name, so the name
    /// stays the same when computed again afterwards. Returns that name.
    pub fn switch_to_test_db(&self) -> Result<String> {
        let mut settings = self.connection.settings_mut();
        let name = test_db_name(&settings)?;
        settings.name = Some(name.clone());
        settings.test.insert(NAME, Some(name.clone()));
        tracing::debug!(alias = self.connection.alias(), name = %name, "switched to test database");
        Ok(name)
    }

    /// Settings for the clone of the test database identified by `suffix`.
    ///
    /// `NAME` and `TEST.NAME` are both `<test db name>_<suffix>`.
    pub fn test_db_clone_settings(&self, suffix: &str) -> Result<DatabaseSettings> {
        let settings = self.connection.settings();
        clone_settings(&settings, suffix)
    }

    /// `CREATE DATABASE` statement that copies the test database into the
    /// clone identified by `suffix`.
    pub fn sql_clone_test_db(&self, suffix: &str) -> Result<String> {
        let settings = self.connection.settings();
        let source = test_db_name(&settings)?;
        let target = clone_name(&source, suffix)?;

        let sql = format!(
            "CREATE DATABASE {} {}",
            quote_name(&target),
            database_create_suffix(None, Some(&source))
        );
        tracing::debug!(
            alias = self.connection.alias(),
            source = %source,
            target = %target,
            "built clone statement"
        );
        Ok(sql)
    }

    /// Signature identifying the test database this connection would use.
    pub fn test_db_signature(&self) -> Result<TestDbSignature> {
        let settings = self.connection.settings();
        Ok(TestDbSignature {
            host: settings.host.clone(),
            port: settings.port,
            engine: settings.engine.clone(),
            name: test_db_name(&settings)?,
        })
    }
}

fn table_creation_suffix(settings: &DatabaseSettings) -> Result<String> {
    let test = &settings.test;
    if let Some(collation) = test.collation() {
        return Err(Error::UnsupportedSetting {
            key: COLLATION.to_string(),
            reason: format!("collation {collation:?} cannot be set at database creation time"),
        });
    }
    if let Some(template) = test.template() {
        validate_identifier(template)?;
    }
    Ok(database_create_suffix(test.charset(), test.template()))
}

fn test_db_name(settings: &DatabaseSettings) -> Result<String> {
    let name = match settings.test.name() {
        Some(name) => name.to_string(),
        None => format!("{TEST_DATABASE_PREFIX}{}", source_name(settings)?),
    };
    validate_identifier(&name)?;
    Ok(name)
}

fn source_name(settings: &DatabaseSettings) -> Result<&str> {
    settings
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::Config("NAME is not configured".into()))
}

fn clone_name(source: &str, suffix: &str) -> Result<String> {
    let name = format!("{source}_{suffix}");
    validate_identifier(&name)?;
    Ok(name)
}

fn clone_settings(settings: &DatabaseSettings, suffix: &str) -> Result<DatabaseSettings> {
    let name = clone_name(&test_db_name(settings)?, suffix)?;
    let mut clone = settings.clone();
    clone.name = Some(name.clone());
    clone.test.insert(NAME, Some(name));
    Ok(clone)
}
