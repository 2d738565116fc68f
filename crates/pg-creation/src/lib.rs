//! # pg-creation
//!
//! PostgreSQL test database creation helpers.
//!
//! This crate computes the SQL a test runner needs to set up PostgreSQL test
//! databases: the `CREATE DATABASE ... WITH ENCODING '...' TEMPLATE "..."`
//! suffix, the test database name, and the statements for dropping and
//! cloning it. Nothing here opens a connection; a [`Connection`] is only a
//! shared handle to one alias's settings.
//!
//! ## Example
//!
//! ```rust
//! use pg_creation::{Connection, DatabaseCreation, DatabaseSettings, TestSettings};
//!
//! let settings = DatabaseSettings::new()
//!     .name("app")
//!     .test(TestSettings::new().with_charset("UTF8").with_template("template0"));
//! let conn = Connection::new("default", settings);
//!
//! let creation = DatabaseCreation::new(&conn);
//! assert_eq!(
//!     creation.sql_table_creation_suffix()?,
//!     "WITH ENCODING 'UTF8' TEMPLATE \"template0\""
//! );
//! assert_eq!(
//!     creation.sql_create_test_db()?,
//!     "CREATE DATABASE \"test_app\" WITH ENCODING 'UTF8' TEMPLATE \"template0\""
//! );
//! # Ok::<(), pg_creation::Error>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod connection;
pub mod creation;
pub mod error;
pub mod quote;
pub mod settings;

// Re-export commonly used types
pub use connection::Connection;
pub use creation::{CreateFailure, DatabaseCreation, TestDbSignature, database_create_suffix};
pub use error::{Error, Result};
pub use quote::{quote_literal, quote_name};
pub use settings::{DatabaseSettings, TestSettings};
