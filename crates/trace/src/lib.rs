//! Recording and comparing execution traces of concurrent SQL sessions.
//!
//! A trace is the sequence of events observed while several sessions run
//! statements against a database: which session invoked which statement,
//! what each statement returned, and when a session was blocked or resumed.
//! Two traces produced independently, by two engines or two runs of the same
//! schedule, can then be checked for equivalence while tolerating benign
//! differences such as row order of unordered queries, timing, and vendor
//! error text.
//!
//! # Core Concepts
//!
//! ## Event
//!
//! An [`Event`] is identified by its [`EventMeta`] (kind and session) and
//! carries a payload that matches its [`Kind`]:
//! - `Block` / `Resume`: no payload
//! - `Invoke`: an [`Invoke`] naming the [`Stmt`] about to run
//! - `Return`: a [`Return`] with start/end timestamps and either a result or
//!   a [`SqlError`]
//!
//! Events encode to self-describing JSON records (see the `codec` module docs)
//! and compare with [`Event::equal_to`], which yields a [`Verdict`].
//!
//! ## SqlError
//!
//! Driver errors are normalized by an [`ErrorWrapper`] into `{code, message}`.
//! Vendor codes compare by code, unclassified errors by message.
//!
//! ## History
//!
//! A [`History`] is an ordered list of events with JSON and text dumps.
//! Concurrent sessions record through [`recorder`], which serializes appends
//! over a channel.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use resultset::ResultSet;
//! use trace::{Event, Return, Stmt, StmtFlags};
//!
//! let stmt = Stmt::new("SELECT * FROM t").with_flags(StmtFlags::UNORDERED);
//! let now = Utc::now();
//!
//! let mut r1 = ResultSet::new(["id", "name"]);
//! r1.push_text_row([Some("1"), Some("a")]);
//! r1.push_text_row([Some("2"), Some("b")]);
//!
//! let mut r2 = ResultSet::new(["id", "name"]);
//! r2.push_text_row([Some("2"), Some("b")]);
//! r2.push_text_row([Some("1"), Some("a")]);
//!
//! let a: Event = Event::new_return("s1", Return::ok(stmt.clone(), [now, now], r1));
//! let b: Event = Event::new_return("s1", Return::ok(stmt, [now, now], r2));
//! assert!(a.equal_to(&b, None).is_equal());
//!
//! let decoded: Event = Event::decode(&a.encode()?)?;
//! assert!(decoded.equal_to(&a, None).is_equal());
//! # Ok::<(), trace::Error>(())
//! ```

mod codec;
mod compare;
mod error;
mod event;
mod handler;
mod history;
mod recorder;
mod sql_error;
mod stmt;
mod text;

pub use compare::Verdict;
pub use error::{Error, Result};
pub use event::{Event, EventMeta, Kind, Payload};
pub use handler::{Handler, compose, text_dumper};
pub use history::{History, JsonDumpOptions};
pub use recorder::{Collector, Recorder, recorder};
pub use sql_error::{ErrorWrapper, SqlError, UNCLASSIFIED, WrapFn, WrapStrategy, wrap_error};
pub use stmt::{Invoke, Outcome, Return, Stmt, StmtFlags};
pub use text::TextDumpOptions;

pub use resultset::{DigestOptions, ResultData, ResultSet};
