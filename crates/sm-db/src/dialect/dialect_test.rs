use super::*;

// ── Registry ────────────────────────────────────────────────────────

#[test]
fn test_builtins_cover_known_drivers() {
    let registry = DialectRegistry::with_builtins();
    for name in [
        "duckdb",
        "postgres",
        "sqlite3",
        "mysql",
        "mssql",
        "oci8",
        "godror",
        "snowflake",
        "clickhouse",
    ] {
        assert!(registry.get(name).is_ok(), "missing dialect {name}");
    }
}

#[test]
fn test_unknown_dialect_lists_available() {
    let mut registry = DialectRegistry::new();
    registry.register("duckdb", DuckDbDialect);
    let err = match registry.get("postgre") {
        Err(e) => e,
        Ok(_) => panic!("expected lookup failure"),
    };
    match err {
        DbError::UnknownDialect { name, available } => {
            assert_eq!(name, "postgre");
            assert_eq!(available, "duckdb");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_register_replaces_entry() {
    let mut registry = DialectRegistry::with_builtins();
    registry.register("duckdb", SqliteDialect);
    let dialect = registry.get("duckdb").unwrap();
    assert_eq!(dialect.create_schema("s"), "SELECT 1;");
}

#[test]
fn test_templates_end_with_terminator() {
    let registry = DialectRegistry::with_builtins();
    for name in registry.names() {
        let d = registry.get(name).unwrap();
        let oracle = name == "oci8" || name == "godror";
        for sql in [d.create_schema("s"), d.create_table(Some("s"), "m")] {
            assert!(sql.ends_with(';'), "{name}: {sql}");
        }
        for sql in [
            d.insert_record(Some("s"), "m"),
            d.delete_record(Some("s"), "m"),
            d.select_records(Some("s"), "m"),
        ] {
            assert_eq!(sql.ends_with(';'), !oracle, "{name}: {sql}");
        }
    }
}

// ── Quoting ─────────────────────────────────────────────────────────

#[test]
fn test_quote_doubles_closing_char() {
    assert_eq!(double_quoted(r#"we"ird"#), r#""we""ird""#);
    assert_eq!(quote_with("a]b", '[', ']'), "[a]]b]");
}

#[test]
fn test_qualified_name() {
    assert_eq!(qualified(None, "t", double_quoted), "\"t\"");
    assert_eq!(qualified(Some("s"), "t", double_quoted), "\"s\".\"t\"");
}

// ── Templates ───────────────────────────────────────────────────────

#[test]
fn test_duckdb_templates() {
    let d = DuckDbDialect;
    assert_eq!(d.create_schema("ops"), "CREATE SCHEMA IF NOT EXISTS \"ops\";");
    assert_eq!(
        d.insert_record(Some("ops"), "migrations"),
        "INSERT INTO \"ops\".\"migrations\" (id, applied_at) VALUES (?, ?);"
    );
    assert_eq!(
        d.delete_record(None, "migrations"),
        "DELETE FROM \"migrations\" WHERE id = ?;"
    );
    assert_eq!(
        d.select_records(None, "migrations"),
        "SELECT id, applied_at FROM \"migrations\" ORDER BY id ASC;"
    );
}

#[test]
fn test_postgres_numbered_placeholders() {
    let d = PostgresDialect;
    assert!(d.insert_record(None, "m").ends_with("VALUES ($1, $2);"));
    assert!(d.delete_record(None, "m").ends_with("WHERE id = $1;"));
    assert!(d
        .create_table(Some("s"), "m")
        .contains("timestamp with time zone"));
}

#[test]
fn test_sqlite_ignores_schema() {
    let d = SqliteDialect;
    assert_eq!(d.create_schema("s"), "SELECT 1;");
    assert_eq!(
        d.select_records(Some("s"), "m"),
        "SELECT id, applied_at FROM \"m\" ORDER BY id ASC;"
    );
}

#[test]
fn test_mysql_engine_and_backticks() {
    let d = MySqlDialect::default();
    let ddl = d.create_table(Some("app"), "migrations");
    assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS `app`.`migrations`"));
    assert!(ddl.ends_with("ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;"));

    let custom = MySqlDialect::new("MyISAM", "latin1").create_table(None, "m");
    assert!(custom.ends_with("ENGINE=MyISAM DEFAULT CHARSET=latin1;"));
}

#[test]
fn test_mssql_existence_checks() {
    let d = MsSqlDialect;
    assert_eq!(
        d.create_schema("o'ps"),
        "IF NOT EXISTS (SELECT 1 FROM sys.schemas WHERE name = N'o''ps') EXEC('CREATE SCHEMA [o''ps]');"
    );
    assert!(d
        .create_table(Some("dbo"), "m")
        .starts_with("IF OBJECT_ID(N'[dbo].[m]', N'U') IS NULL CREATE TABLE [dbo].[m]"));
    assert!(d.insert_record(None, "m").ends_with("VALUES (@p1, @p2);"));
}

#[test]
fn test_oracle_plsql_and_placeholders() {
    let d = OracleDialect;
    assert_eq!(d.create_schema("anything"), "BEGIN NULL; END;");
    let ddl = d.create_table(None, "migrations");
    assert!(ddl.contains("EXECUTE IMMEDIATE 'CREATE TABLE \"MIGRATIONS\""));
    assert!(ddl.contains("SQLCODE != -955"));
    assert_eq!(
        d.delete_record(Some("app"), "migrations"),
        "DELETE FROM \"APP\".\"MIGRATIONS\" WHERE id = :1"
    );
}

#[test]
fn test_snowflake_templates() {
    let d = SnowflakeDialect;
    assert!(d.create_table(None, "m").contains("TIMESTAMP_TZ"));
    assert!(d.insert_record(None, "m").ends_with("VALUES (?, ?);"));
}

#[test]
fn test_clickhouse_engine_and_cluster() {
    let d = ClickHouseDialect::default();
    assert_eq!(
        d.create_schema("db"),
        "CREATE DATABASE IF NOT EXISTS \"db\";"
    );
    assert!(d
        .create_table(None, "m")
        .ends_with("ENGINE = MergeTree() ORDER BY id;"));

    let clustered = ClickHouseDialect::default()
        .with_engine("ReplicatedMergeTree ORDER BY id")
        .with_cluster("main");
    assert_eq!(
        clustered.create_schema("db"),
        "CREATE DATABASE IF NOT EXISTS \"db\" ON CLUSTER \"main\";"
    );
    assert_eq!(
        clustered.delete_record(None, "m"),
        "ALTER TABLE \"m\" ON CLUSTER \"main\" DELETE WHERE id = ?;"
    );
}
