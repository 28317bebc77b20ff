use super::*;

fn parse(text: &str) -> SqlResult<ParsedMigration> {
    MigrationParser::new().parse(text)
}

#[test]
fn test_simple_up_down() {
    let parsed = parse(
        "-- +migrate Up\nCREATE TABLE people (id int);\n\n-- +migrate Down\nDROP TABLE people;\n",
    )
    .unwrap();
    assert_eq!(parsed.up_statements, vec!["CREATE TABLE people (id int);\n"]);
    assert_eq!(parsed.down_statements, vec!["DROP TABLE people;\n"]);
    assert!(!parsed.disable_transaction_up);
    assert!(!parsed.disable_transaction_down);
}

#[test]
fn test_multiple_statements_and_multiline() {
    let parsed = parse(
        "-- +migrate Up\nCREATE TABLE a (\n  id int\n);\nCREATE TABLE b (id int);\n-- +migrate Down\nDROP TABLE b;\nDROP TABLE a;\n",
    )
    .unwrap();
    assert_eq!(
        parsed.up_statements,
        vec!["CREATE TABLE a (\n  id int\n);\n", "CREATE TABLE b (id int);\n"]
    );
    assert_eq!(parsed.down_statements.len(), 2);
}

#[test]
fn test_comments_are_dropped() {
    let parsed = parse(
        "-- header comment\n-- +migrate Up\n-- explain the table\nCREATE TABLE t (id int); -- trailing\n-- +migrate Down\n-- nothing to undo\n",
    )
    .unwrap();
    assert_eq!(
        parsed.up_statements,
        vec!["CREATE TABLE t (id int); -- trailing\n"]
    );
    assert!(parsed.down_statements.is_empty());
}

#[test]
fn test_semicolon_inside_trailing_comment_does_not_terminate() {
    let parsed = parse("-- +migrate Up\nSELECT 1 -- not done;\n;\n").unwrap();
    assert_eq!(parsed.up_statements, vec!["SELECT 1 -- not done;\n;\n"]);
}

#[test]
fn test_notransaction_flags() {
    let parsed = parse(
        "-- +migrate Up notransaction\nCREATE INDEX CONCURRENTLY i ON t (c);\n-- +migrate Down\nDROP INDEX i;\n",
    )
    .unwrap();
    assert!(parsed.disable_transaction_up);
    assert!(!parsed.disable_transaction_down);

    let parsed = parse("-- +migrate Up\nSELECT 1;\n-- +migrate Down notransaction\nSELECT 2;\n").unwrap();
    assert!(!parsed.disable_transaction_up);
    assert!(parsed.disable_transaction_down);
}

#[test]
fn test_statement_block_keeps_inner_semicolons() {
    let text = "\
-- +migrate Up
-- +migrate StatementBegin
CREATE FUNCTION f() RETURNS int AS $$
BEGIN
  RETURN 1;
END;
$$ LANGUAGE plpgsql;
-- +migrate StatementEnd
CREATE TABLE t (id int);
-- +migrate Down
DROP FUNCTION f();
DROP TABLE t;
";
    let parsed = parse(text).unwrap();
    assert_eq!(parsed.up_statements.len(), 2);
    assert_eq!(
        parsed.up_statements[0],
        "CREATE FUNCTION f() RETURNS int AS $$\nBEGIN\n  RETURN 1;\nEND;\n$$ LANGUAGE plpgsql;\n"
    );
    assert_eq!(parsed.up_statements[1], "CREATE TABLE t (id int);\n");
    assert_eq!(parsed.down_statements.len(), 2);
}

#[test]
fn test_no_direction_is_error() {
    assert_eq!(parse("CREATE TABLE t (id int);\n"), Err(SqlError::NoDirection));
    assert_eq!(parse(""), Err(SqlError::NoDirection));
}

#[test]
fn test_unterminated_before_down() {
    let err = parse("-- +migrate Up\nCREATE TABLE t (id int)\n-- +migrate Down\nDROP TABLE t;\n")
        .unwrap_err();
    assert_eq!(err, SqlError::UnterminatedStatement { line: 2 });
}

#[test]
fn test_unterminated_at_end_of_file() {
    let err = parse("-- +migrate Up\nSELECT 1;\n-- +migrate Down\nDROP TABLE t\n").unwrap_err();
    assert_eq!(err, SqlError::UnterminatedStatement { line: 4 });
}

#[test]
fn test_unclosed_block() {
    let err = parse("-- +migrate Up\n-- +migrate StatementBegin\nSELECT 1;\n").unwrap_err();
    assert_eq!(err, SqlError::UnclosedStatementBlock);
}

#[test]
fn test_incomplete_command() {
    let err = parse("-- +migrate \nSELECT 1;\n").unwrap_err();
    assert_eq!(err, SqlError::IncompleteCommand { line: 1 });
}

#[test]
fn test_line_separator() {
    let parser = MigrationParser::new().with_line_separator("GO");
    let parsed = parser
        .parse("-- +migrate Up\nCREATE TABLE t (id int)\nGO\nINSERT INTO t VALUES (1)\nGO\n-- +migrate Down\nDROP TABLE t\nGO\n")
        .unwrap();
    assert_eq!(
        parsed.up_statements,
        vec!["CREATE TABLE t (id int)\n", "INSERT INTO t VALUES (1)\n"]
    );
    assert_eq!(parsed.down_statements, vec!["DROP TABLE t\n"]);
}

#[test]
fn test_crlf_line_endings() {
    let parsed = parse("-- +migrate Up\r\nSELECT 1;\r\n-- +migrate Down\r\nSELECT 2;\r\n").unwrap();
    assert_eq!(parsed.up_statements, vec!["SELECT 1;\n"]);
    assert_eq!(parsed.down_statements, vec!["SELECT 2;\n"]);
}

#[test]
fn test_ends_with_semicolon() {
    assert!(ends_with_semicolon("SELECT 1;"));
    assert!(ends_with_semicolon("SELECT 1; -- comment"));
    assert!(!ends_with_semicolon("SELECT 1 -- comment;"));
    assert!(!ends_with_semicolon(""));
    assert!(!ends_with_semicolon("-- +migrate Up"));
}
