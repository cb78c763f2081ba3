//! Statements and the values carried by invoke/return events.

use crate::SqlError;
use chrono::{DateTime, TimeDelta, Utc};
use resultset::ResultSet;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Statement flags, supplied by whoever built the schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StmtFlags(u32);

impl StmtFlags {
    pub const NONE: Self = Self(0);
    /// The statement is expected to block on another session.
    pub const WAIT: Self = Self(1);
    /// The statement's result rows have no guaranteed order.
    pub const UNORDERED: Self = Self(1 << 1);
    /// The statement returns rows.
    pub const QUERY: Self = Self(1 << 2);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for StmtFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A SQL statement as scheduled for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stmt {
    pub sql: String,
    #[serde(default)]
    pub flags: StmtFlags,
}

impl Stmt {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            flags: StmtFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: StmtFlags) -> Self {
        self.flags = self.flags | flags;
        self
    }

    pub fn is_unordered(&self) -> bool {
        self.flags.contains(StmtFlags::UNORDERED)
    }
}

/// A statement a session is about to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoke {
    pub sess: String,
    pub stmt: Stmt,
}

impl Invoke {
    pub fn new(sess: impl Into<String>, stmt: Stmt) -> Self {
        Self {
            sess: sess.into(),
            stmt,
        }
    }
}

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<R = ResultSet> {
    Result(R),
    Error(SqlError),
}

/// The outcome of a previously invoked statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Return<R = ResultSet> {
    pub stmt: Stmt,
    /// Start and end of execution.
    ///
    /// Decoded records without a `t` entry get the Unix epoch.
    pub t: [DateTime<Utc>; 2],
    pub outcome: Outcome<R>,
}

impl<R> Return<R> {
    pub fn ok(stmt: Stmt, t: [DateTime<Utc>; 2], res: R) -> Self {
        Self {
            stmt,
            t,
            outcome: Outcome::Result(res),
        }
    }

    pub fn err(stmt: Stmt, t: [DateTime<Utc>; 2], err: SqlError) -> Self {
        Self {
            stmt,
            t,
            outcome: Outcome::Error(err),
        }
    }

    /// Record a driver failure, normalized through the default error wrapper.
    pub fn failed(
        stmt: Stmt,
        t: [DateTime<Utc>; 2],
        err: &(dyn std::error::Error + 'static),
    ) -> Self {
        Self::err(stmt, t, crate::ErrorWrapper::global().wrap(err))
    }

    pub fn result(&self) -> Option<&R> {
        match &self.outcome {
            Outcome::Result(res) => Some(res),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SqlError> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(err) => Some(err),
        }
    }

    pub fn elapsed(&self) -> TimeDelta {
        self.t[1] - self.t[0]
    }
}
