//! Captured SQL results and their content digests.
//!
//! A [`ResultSet`] is what a statement produced: either an *exec result*
//! (affected rows and last insert id, no row data) or a table of raw cell
//! values. Trace recording only needs a handful of capabilities from a
//! result, which are collected in the [`ResultData`] trait so that other
//! containers can be plugged into the trace layer.
//!
//! # Digests
//!
//! Two results are compared by digesting their row data rather than diffing
//! them cell by cell. [`DigestOptions::sort`] digests the rows in a canonical
//! order, which makes results of unordered queries comparable.
//!
//! # Example
//!
//! ```
//! use resultset::{DigestOptions, ResultData, ResultSet};
//!
//! let mut a = ResultSet::new(["id", "name"]);
//! a.push_text_row([Some("1"), Some("a")]);
//! a.push_text_row([Some("2"), Some("b")]);
//!
//! let mut b = ResultSet::new(["id", "name"]);
//! b.push_text_row([Some("2"), Some("b")]);
//! b.push_text_row([Some("1"), Some("a")]);
//!
//! let sorted = DigestOptions { sort: true };
//! assert_eq!(a.data_digest(&sorted), b.data_digest(&sorted));
//! assert_ne!(
//!     a.data_digest(&DigestOptions::default()),
//!     b.data_digest(&DigestOptions::default())
//! );
//! ```

mod data;
mod error;
mod set;
pub mod sqlite;

pub use data::{DigestOptions, ResultData};
pub use error::{Error, Result};
pub use set::{ExecResult, ResultSet};
