//! Annotated migration file parser
//!
//! A migration file is plain SQL with `-- +migrate` command comments:
//!
//! ```sql
//! -- +migrate Up
//! CREATE TABLE people (id int);
//!
//! -- +migrate StatementBegin
//! CREATE FUNCTION touch() RETURNS trigger AS $$
//! BEGIN
//!   NEW.updated_at = now();
//!   RETURN NEW;
//! END;
//! $$ LANGUAGE plpgsql;
//! -- +migrate StatementEnd
//!
//! -- +migrate Down notransaction
//! DROP TABLE people;
//! ```
//!
//! Statements are terminated by a line whose last non-comment word ends in a
//! semicolon. Inside a `StatementBegin`/`StatementEnd` block semicolons are
//! ignored and the block forms a single statement.

use crate::error::{SqlError, SqlResult};

const COMMAND_PREFIX: &str = "-- +migrate ";
const NO_TRANSACTION: &str = "notransaction";

/// Result of parsing one migration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMigration {
    /// Statements under `-- +migrate Up`, in file order
    pub up_statements: Vec<String>,
    /// Statements under `-- +migrate Down`, in file order
    pub down_statements: Vec<String>,
    /// `notransaction` was set on the Up command
    pub disable_transaction_up: bool,
    /// `notransaction` was set on the Down command
    pub disable_transaction_down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Up,
    Down,
}

struct Command<'a> {
    name: &'a str,
    options: Vec<&'a str>,
}

impl<'a> Command<'a> {
    fn parse(rest: &'a str, line: usize) -> SqlResult<Self> {
        let mut fields = rest.split_whitespace();
        let name = fields
            .next()
            .ok_or(SqlError::IncompleteCommand { line })?;
        Ok(Self {
            name,
            options: fields.collect(),
        })
    }

    fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| *o == option)
    }
}

/// Splits migration text into up and down statements.
#[derive(Debug, Clone, Default)]
pub struct MigrationParser {
    line_separator: Option<String>,
}

impl MigrationParser {
    /// Create a parser that only splits on semicolons
    pub fn new() -> Self {
        Self::default()
    }

    /// Also end a statement at any line exactly equal to `separator`
    /// (for example `GO` for SQL Server scripts).
    pub fn with_line_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        self.line_separator = (!separator.is_empty()).then_some(separator);
        self
    }

    /// Parse migration text
    pub fn parse(&self, text: &str) -> SqlResult<ParsedMigration> {
        let mut parsed = ParsedMigration::default();
        let mut buf = String::new();
        let mut section: Option<Section> = None;
        let mut in_block = false;
        let mut block_ended = false;
        let mut line_no = 0;

        for (idx, line) in text.lines().enumerate() {
            line_no = idx + 1;

            // Plain comments are dropped; only `-- +` lines carry commands.
            if line.starts_with("-- ") && !line.starts_with("-- +") {
                continue;
            }

            if let Some(rest) = line.strip_prefix(COMMAND_PREFIX) {
                let command = Command::parse(rest, line_no)?;
                match command.name {
                    "Up" | "Down" => {
                        if !buf.trim().is_empty() {
                            return Err(SqlError::UnterminatedStatement { line: line_no - 1 });
                        }
                        buf.clear();
                        let disable = command.has_option(NO_TRANSACTION);
                        if command.name == "Up" {
                            section = Some(Section::Up);
                            parsed.disable_transaction_up |= disable;
                        } else {
                            section = Some(Section::Down);
                            parsed.disable_transaction_down |= disable;
                        }
                    }
                    "StatementBegin" => {
                        if section.is_some() {
                            in_block = true;
                        }
                    }
                    "StatementEnd" => {
                        if section.is_some() {
                            block_ended = in_block;
                            in_block = false;
                        }
                    }
                    _ => {}
                }
            }

            let Some(current) = section else {
                continue;
            };

            let is_separator = !in_block && self.line_separator.as_deref() == Some(line);
            if !is_separator && !line.starts_with("-- +") {
                buf.push_str(line);
                buf.push('\n');
            }

            if (!in_block && (ends_with_semicolon(line) || is_separator)) || block_ended {
                block_ended = false;
                let statement = std::mem::take(&mut buf);
                match current {
                    Section::Up => parsed.up_statements.push(statement),
                    Section::Down => parsed.down_statements.push(statement),
                }
            }
        }

        if in_block {
            return Err(SqlError::UnclosedStatementBlock);
        }
        if section.is_none() {
            return Err(SqlError::NoDirection);
        }
        if !buf.trim().is_empty() {
            return Err(SqlError::UnterminatedStatement { line: line_no });
        }

        Ok(parsed)
    }
}

/// True when the last word before any `--` comment ends with `;`.
fn ends_with_semicolon(line: &str) -> bool {
    line.split_whitespace()
        .take_while(|word| !word.starts_with("--"))
        .last()
        .is_some_and(|word| word.ends_with(';'))
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
