//! # pg-testing
//!
//! Test infrastructure for the PostgreSQL creation helpers.
//!
//! ## Features
//!
//! - Scoped overlay of a connection's `TEST` settings, restored on drop
//!   (including when the test body panics)
//! - Connection fixtures, optionally built from a libpq connection string
//!
//! ## Example
//!
//! ```rust
//! use pg_creation::{DatabaseCreation, TestSettings};
//! use pg_testing::{TestFixture, with_changed_test_settings};
//!
//! let conn = TestFixture::new("app").connection();
//! let suffix = with_changed_test_settings(
//!     &conn,
//!     &TestSettings::empty().with_charset("UTF8"),
//!     || DatabaseCreation::new(&conn).sql_table_creation_suffix(),
//! )?;
//! assert_eq!(suffix, "WITH ENCODING 'UTF8'");
//! # Ok::<(), pg_creation::Error>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod fixtures;
pub mod overlay;

pub use fixtures::TestFixture;
pub use overlay::{ChangedTestSettings, with_changed_test_settings};
