//! `CREATE DATABASE` suffix tests driven through the settings overlay.
//!
//! Each case overlays `TEST` settings on a shared connection, computes the
//! suffix, and checks the exact string.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pg_creation::settings::{CHARSET, TEMPLATE};
use pg_creation::{Connection, DatabaseCreation, TestSettings};
use pg_testing::{TestFixture, with_changed_test_settings};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn check_sql_table_creation_suffix(conn: &Connection, settings: TestSettings, expected: &str) {
    with_changed_test_settings(conn, &settings, || {
        let creation = DatabaseCreation::new(conn);
        let suffix = creation.sql_table_creation_suffix().unwrap();
        assert_eq!(suffix, expected);
    });
}

// ============================================================================
// Suffix Scenarios
// ============================================================================

#[test]
fn test_sql_table_creation_suffix_with_none_settings() {
    init_tracing();
    let conn = TestFixture::new("app").connection();
    let settings = TestSettings::empty().with_null(CHARSET).with_null(TEMPLATE);
    check_sql_table_creation_suffix(&conn, settings, "");
}

#[test]
fn test_sql_table_creation_suffix_with_encoding() {
    init_tracing();
    let conn = TestFixture::new("app").connection();
    let settings = TestSettings::empty().with_charset("UTF8");
    check_sql_table_creation_suffix(&conn, settings, "WITH ENCODING 'UTF8'");
}

#[test]
fn test_sql_table_creation_suffix_with_template() {
    init_tracing();
    let conn = TestFixture::new("app").connection();
    let settings = TestSettings::empty().with_template("template0");
    check_sql_table_creation_suffix(&conn, settings, "WITH TEMPLATE \"template0\"");
}

#[test]
fn test_sql_table_creation_suffix_with_encoding_and_template() {
    init_tracing();
    let conn = TestFixture::new("app").connection();
    let settings = TestSettings::empty()
        .with_charset("UTF8")
        .with_template("template0");
    check_sql_table_creation_suffix(
        &conn,
        settings,
        "WITH ENCODING 'UTF8' TEMPLATE \"template0\"",
    );
}

// ============================================================================
// Sequencing
// ============================================================================

#[test]
fn test_scenarios_do_not_leak_into_each_other() {
    init_tracing();
    let conn = TestFixture::new("app").connection();

    check_sql_table_creation_suffix(
        &conn,
        TestSettings::empty()
            .with_charset("UTF8")
            .with_template("template0"),
        "WITH ENCODING 'UTF8' TEMPLATE \"template0\"",
    );
    check_sql_table_creation_suffix(
        &conn,
        TestSettings::empty().with_charset("UTF8"),
        "WITH ENCODING 'UTF8'",
    );
    check_sql_table_creation_suffix(
        &conn,
        TestSettings::empty().with_template("template0"),
        "WITH TEMPLATE \"template0\"",
    );

    assert_eq!(
        DatabaseCreation::new(&conn)
            .sql_table_creation_suffix()
            .unwrap(),
        ""
    );
}

#[test]
fn test_overlay_changes_full_create_statement() {
    let conn = TestFixture::new("app").connection();
    let sql = with_changed_test_settings(
        &conn,
        &TestSettings::empty()
            .with_charset("UTF8")
            .with_template("template0"),
        || DatabaseCreation::new(&conn).sql_create_test_db().unwrap(),
    );
    assert_eq!(
        sql,
        "CREATE DATABASE \"test_app\" WITH ENCODING 'UTF8' TEMPLATE \"template0\""
    );
    assert_eq!(
        DatabaseCreation::new(&conn).sql_create_test_db().unwrap(),
        "CREATE DATABASE \"test_app\""
    );
}

#[test]
fn test_collation_overlay_rejected_then_restored() {
    let conn = TestFixture::new("app").connection();
    let result = with_changed_test_settings(
        &conn,
        &TestSettings::empty().with_collation("C"),
        || DatabaseCreation::new(&conn).sql_table_creation_suffix(),
    );
    assert!(result.is_err());
    assert!(DatabaseCreation::new(&conn).sql_table_creation_suffix().is_ok());
}

// ============================================================================
// Parallel Clones
// ============================================================================

#[test]
fn test_clone_uses_created_test_db_as_template() {
    let conn = TestFixture::from_connection_string("unused", "host=db.internal dbname=app")
        .unwrap()
        .connection();
    let creation = DatabaseCreation::new(&conn);

    let overrides = TestSettings::empty().with_charset("UTF8");
    let create = with_changed_test_settings(&conn, &overrides, || {
        creation.sql_create_test_db().unwrap()
    });
    assert_eq!(create, "CREATE DATABASE \"test_app\" WITH ENCODING 'UTF8'");

    assert_eq!(creation.switch_to_test_db().unwrap(), "test_app");
    assert_eq!(
        creation.sql_clone_test_db("1").unwrap(),
        "CREATE DATABASE \"test_app_1\" WITH TEMPLATE \"test_app\""
    );
    assert_eq!(
        creation.sql_clone_test_db("2").unwrap(),
        "CREATE DATABASE \"test_app_2\" WITH TEMPLATE \"test_app\""
    );
}
