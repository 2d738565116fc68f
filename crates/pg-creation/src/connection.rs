//! Shared handle to one database alias's settings.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::settings::{DatabaseSettings, TestSettings};

/// Vendor name reported by every connection in this crate.
pub const VENDOR: &str = "postgresql";

/// A named database alias and its settings.
///
/// Cloning a `Connection` shares the same settings; a change made through
/// one clone is visible through all of them. No socket is ever opened.
#[derive(Debug, Clone)]
pub struct Connection {
    alias: Arc<str>,
    settings: Arc<RwLock<DatabaseSettings>>,
}

impl Connection {
    /// Create a connection for `alias` with the given settings.
    #[must_use]
    pub fn new(alias: impl Into<String>, settings: DatabaseSettings) -> Self {
        let alias: String = alias.into();
        Self {
            alias: alias.into(),
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Alias this connection was registered under.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Database vendor.
    #[must_use]
    pub fn vendor(&self) -> &'static str {
        VENDOR
    }

    /// Borrow the settings for reading.
    ///
    /// Do not hold the guard across calls that lock again.
    pub fn settings(&self) -> RwLockReadGuard<'_, DatabaseSettings> {
        self.settings.read()
    }

    /// Borrow the settings for writing.
    pub fn settings_mut(&self) -> RwLockWriteGuard<'_, DatabaseSettings> {
        self.settings.write()
    }

    /// Snapshot of the `TEST` mapping.
    #[must_use]
    pub fn test_settings(&self) -> TestSettings {
        self.settings.read().test.clone()
    }

    /// Mutate the `TEST` mapping under the write lock.
    pub fn update_test_settings<R>(&self, f: impl FnOnce(&mut TestSettings) -> R) -> R {
        f(&mut self.settings.write().test)
    }
}
