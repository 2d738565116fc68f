//! Scoped overlay of a connection's `TEST` settings.

use std::collections::BTreeMap;

use pg_creation::{Connection, TestSettings};

/// Guard that overlays `TEST` settings and restores them on drop.
///
/// For every overlaid key, the previous entry is put back exactly: a key
/// that held a value (or null) gets it back, a key that was absent is
/// removed. Restoring happens in `Drop`, so it also runs when the test body
/// panics.
///
/// ```rust
/// use pg_creation::{Connection, DatabaseSettings, TestSettings};
/// use pg_testing::ChangedTestSettings;
///
/// let conn = Connection::new("default", DatabaseSettings::new().name("app"));
/// {
///     let _guard = ChangedTestSettings::apply(&conn, &TestSettings::empty().with_charset("UTF8"));
///     assert_eq!(conn.test_settings().charset(), Some("UTF8"));
/// }
/// assert_eq!(conn.test_settings().charset(), None);
/// ```
#[must_use = "settings are restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ChangedTestSettings<'a> {
    connection: &'a Connection,
    keys: Vec<String>,
    saved: BTreeMap<String, Option<String>>,
}

impl<'a> ChangedTestSettings<'a> {
    /// Overlay every entry of `overrides` onto `connection`'s `TEST` mapping.
    pub fn apply(connection: &'a Connection, overrides: &TestSettings) -> Self {
        let mut keys = Vec::with_capacity(overrides.len());
        let mut saved = BTreeMap::new();

        connection.update_test_settings(|test| {
            for (key, value) in overrides.iter() {
                if let Some(previous) = test.get(key) {
                    saved.insert(key.to_string(), previous.map(str::to_string));
                }
                test.insert(key, value.map(str::to_string));
                keys.push(key.to_string());
            }
        });
        tracing::trace!(
            alias = connection.alias(),
            keys = ?keys,
            "applied test settings overlay"
        );

        Self {
            connection,
            keys,
            saved,
        }
    }

    /// Keys this guard overlaid.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Drop for ChangedTestSettings<'_> {
    fn drop(&mut self) {
        let keys = std::mem::take(&mut self.keys);
        let mut saved = std::mem::take(&mut self.saved);

        self.connection.update_test_settings(|test| {
            for key in &keys {
                match saved.remove(key) {
                    Some(previous) => {
                        test.insert(key.clone(), previous);
                    }
                    None => {
                        test.remove(key);
                    }
                }
            }
        });
        tracing::trace!(
            alias = self.connection.alias(),
            keys = ?keys,
            panicking = std::thread::panicking(),
            "restored test settings"
        );
    }
}

/// Run `body` with `overrides` applied to `connection`'s `TEST` mapping.
///
/// The mapping is restored before this returns, or while unwinding if
/// `body` panics.
pub fn with_changed_test_settings<R>(
    connection: &Connection,
    overrides: &TestSettings,
    body: impl FnOnce() -> R,
) -> R {
    let _guard = ChangedTestSettings::apply(connection, overrides);
    body()
}
