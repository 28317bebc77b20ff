//! Strongly-typed migration identifier.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use crate::error::{CoreError, CoreResult};

/// Identifier of a migration, usually the file name it was read from.
///
/// Ordering is plain lexicographic string ordering, so `"10_b"` sorts before
/// `"2_a"`. The numeric prefix is only consulted through [`version`](Self::version).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationId(String);

impl MigrationId {
    /// Create a new `MigrationId`, panicking in debug builds if the id is empty.
    ///
    /// Prefer [`parse`](Self::parse) when handling untrusted input.
    pub fn new(id: impl Into<String>) -> Self {
        let s = id.into();
        debug_assert!(!s.is_empty(), "MigrationId must not be empty");
        Self(s)
    }

    /// Validate and wrap an id coming from a file name or a stored record.
    pub fn parse(id: impl Into<String>) -> CoreResult<Self> {
        let s = id.into();
        if s.trim().is_empty() {
            return Err(CoreError::InvalidMigrationId {
                id: s,
                reason: "id must not be blank".to_string(),
            });
        }
        Ok(Self(s))
    }

    /// Return the underlying id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Leading run of ASCII digits interpreted as a version number.
    ///
    /// Returns `None` when the id does not start with a digit or the digits
    /// overflow an `i64`.
    pub fn version(&self) -> Option<i64> {
        let end = self
            .0
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.0.len());
        if end == 0 {
            return None;
        }
        self.0[..end].parse().ok()
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MigrationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MigrationId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for MigrationId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
