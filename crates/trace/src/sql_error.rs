//! Portable SQL errors and driver error wrapping.
//!
//! Every error that enters a trace goes through an [`ErrorWrapper`], which
//! turns driver-specific shapes into a [`SqlError`]. Supporting another driver
//! means registering one more [`WrapStrategy`]; the comparator only ever sees
//! `SqlError`.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::sync::LazyLock;

/// Code of an error that was not recognized by any wrap strategy.
pub const UNCLASSIFIED: i64 = -1;

/// An execution failure as recorded in a trace.
///
/// - `code == 0`: no vendor code, only the message is meaningful.
/// - `code < 0`: unclassified, compared by message.
/// - `code > 0`: vendor error number, compared by code alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlError {
    pub code: i64,
    pub message: String,
}

impl SqlError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(UNCLASSIFIED, message)
    }

    pub fn is_unclassified(&self) -> bool {
        self.code < 0
    }
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code == 0 {
            f.write_str(&self.message)
        } else {
            write!(f, "E{}: {}", self.code, self.message)
        }
    }
}

impl StdError for SqlError {}

/// Recognizes one driver error shape.
pub type WrapFn = fn(&(dyn StdError + 'static)) -> Option<SqlError>;

/// A way of recognizing a driver error.
#[derive(Debug, Clone, Copy)]
pub enum WrapStrategy {
    /// The error already is a [`SqlError`].
    Portable,
    /// A `rusqlite` failure reported by SQLite, keyed by its extended result code.
    Sqlite,
    /// Any other driver.
    Custom(WrapFn),
}

impl WrapStrategy {
    fn apply(&self, err: &(dyn StdError + 'static)) -> Option<SqlError> {
        match self {
            WrapStrategy::Portable => err.downcast_ref::<SqlError>().cloned(),
            WrapStrategy::Sqlite => match err.downcast_ref::<rusqlite::Error>()? {
                rusqlite::Error::SqliteFailure(e, msg) => Some(SqlError::new(
                    i64::from(e.extended_code),
                    msg.clone().unwrap_or_else(|| e.to_string()),
                )),
                _ => None,
            },
            WrapStrategy::Custom(f) => f(err),
        }
    }
}

/// An ordered set of wrap strategies, tried first to last.
#[derive(Debug, Clone)]
pub struct ErrorWrapper {
    strategies: Vec<WrapStrategy>,
}

static GLOBAL: LazyLock<ErrorWrapper> = LazyLock::new(ErrorWrapper::default);

impl ErrorWrapper {
    /// A wrapper that recognizes nothing but [`SqlError`] itself.
    pub fn new() -> Self {
        Self {
            strategies: vec![WrapStrategy::Portable],
        }
    }

    /// The wrapper used by [`wrap_error`] and [`Return::failed`](crate::Return::failed).
    pub fn global() -> &'static ErrorWrapper {
        &GLOBAL
    }

    pub fn with(mut self, strategy: WrapStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn wrap(&self, err: &(dyn StdError + 'static)) -> SqlError {
        self.strategies
            .iter()
            .find_map(|s| s.apply(err))
            .unwrap_or_else(|| SqlError::unclassified(err.to_string()))
    }
}

impl Default for ErrorWrapper {
    fn default() -> Self {
        Self::new().with(WrapStrategy::Sqlite)
    }
}

/// Normalize an optional error with the global wrapper.
pub fn wrap_error(err: Option<&(dyn StdError + 'static)>) -> Option<SqlError> {
    err.map(|e| ErrorWrapper::global().wrap(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[derive(Debug)]
    struct DriverError {
        number: u16,
        message: String,
    }

    impl fmt::Display for DriverError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Error {}: {}", self.number, self.message)
        }
    }

    impl StdError for DriverError {}

    fn wrap_driver(err: &(dyn StdError + 'static)) -> Option<SqlError> {
        let err = err.downcast_ref::<DriverError>()?;
        Some(SqlError::new(i64::from(err.number), err.message.clone()))
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlError::new(0, "boom").to_string(), "boom");
        assert_eq!(SqlError::new(1062, "dup").to_string(), "E1062: dup");
        assert_eq!(SqlError::unclassified("lost").to_string(), "E-1: lost");
    }

    #[test]
    fn test_none_wraps_to_none() {
        assert_eq!(wrap_error(None), None);
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let err = SqlError::new(1062, "Duplicate entry");
        let dyn_err: &(dyn StdError + 'static) = &err;
        assert_eq!(wrap_error(Some(dyn_err)), Some(err.clone()));
    }

    #[test]
    fn test_unknown_error_is_unclassified() {
        let err = std::io::Error::other("connection reset");
        let wrapped = ErrorWrapper::global().wrap(&err);
        assert_eq!(wrapped, SqlError::unclassified("connection reset"));
    }

    #[test]
    fn test_sqlite_failure_keeps_extended_code() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();

        let wrapped = ErrorWrapper::global().wrap(&err);
        assert_eq!(wrapped.code, 2067); // SQLITE_CONSTRAINT_UNIQUE
        assert!(wrapped.message.contains("UNIQUE constraint failed"));
    }

    #[test]
    fn test_non_failure_sqlite_error_is_unclassified() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        assert!(ErrorWrapper::global().wrap(&err).is_unclassified());
    }

    #[test]
    fn test_custom_strategy() {
        let err = DriverError {
            number: 1064,
            message: "You have an error in your SQL syntax".into(),
        };
        assert!(ErrorWrapper::default().wrap(&err).is_unclassified());

        let wrapper = ErrorWrapper::default().with(WrapStrategy::Custom(wrap_driver));
        assert_eq!(
            wrapper.wrap(&err),
            SqlError::new(1064, "You have an error in your SQL syntax")
        );
    }
}
