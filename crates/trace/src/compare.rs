//! Behavioral equivalence of events.

use crate::{Event, Kind, Outcome};
use resultset::{DigestOptions, ResultData};
use std::fmt;

/// Outcome of comparing two events or histories.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Equal,
    /// Not equivalent, with a diagnostic naming both sides.
    Differ(String),
}

impl Verdict {
    pub fn is_equal(&self) -> bool {
        matches!(self, Verdict::Equal)
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Verdict::Equal => None,
            Verdict::Differ(msg) => Some(msg),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Equal => f.write_str("equal"),
            Verdict::Differ(msg) => f.write_str(msg),
        }
    }
}

impl<R: ResultData> Event<R> {
    /// Decide whether `other` is equivalent to `self`, the expected event.
    ///
    /// Row data is compared by digest. Rows are sorted before digesting when
    /// `opts` asks for it or the statement is flagged unordered. Errors with a
    /// vendor code match on code alone; unclassified errors (negative code on
    /// `self`) must also carry the same message.
    ///
    /// # Panics
    ///
    /// Panics if either event's payload does not match its kind.
    pub fn equal_to(&self, other: &Event<R>, opts: Option<&DigestOptions>) -> Verdict {
        if self.meta() != other.meta() {
            return Verdict::Differ(format!("expect {:?}, got {:?}", self.meta(), other.meta()));
        }

        match self.kind() {
            Kind::Block | Kind::Resume => Verdict::Equal,
            Kind::Invoke => {
                let (this, that) = (self.invoke(), other.invoke());
                let tag = format!("{}({})", self.meta(), this.stmt.sql);
                if this.stmt != that.stmt {
                    return Verdict::Differ(format!(
                        "{tag}: expect {:?}, got {:?}",
                        this.stmt, that.stmt
                    ));
                }
                Verdict::Equal
            }
            Kind::Return => {
                let (this, that) = (self.ret(), other.ret());
                let tag = format!("{}({})", self.meta(), this.stmt.sql);
                if this.stmt != that.stmt {
                    return Verdict::Differ(format!(
                        "{tag}: expect {:?}, got {:?}",
                        this.stmt, that.stmt
                    ));
                }

                match (&this.outcome, &that.outcome) {
                    (Outcome::Error(e1), Outcome::Result(_)) => {
                        Verdict::Differ(format!("{tag}: expect ({e1}), got ok"))
                    }
                    (Outcome::Error(e1), Outcome::Error(e2)) => {
                        if e1.code != e2.code || (e1.is_unclassified() && e1.message != e2.message)
                        {
                            Verdict::Differ(format!("{tag}: expect ({e1}), got ({e2})"))
                        } else {
                            Verdict::Equal
                        }
                    }
                    (Outcome::Result(_), Outcome::Error(e2)) => {
                        Verdict::Differ(format!("{tag}: expect a result, got ({e2})"))
                    }
                    (Outcome::Result(r1), Outcome::Result(r2)) => {
                        if r1.is_exec_result() != r2.is_exec_result() {
                            return Verdict::Differ(format!("{tag}: expect [{r1}], got [{r2}]"));
                        }
                        if r1.is_exec_result() {
                            return Verdict::Equal;
                        }

                        let mut o = opts.copied().unwrap_or_default();
                        o.sort = o.sort || this.stmt.is_unordered();
                        let (h1, h2) = (r1.data_digest(&o), r2.data_digest(&o));
                        if h1 != h2 {
                            return Verdict::Differ(format!(
                                "{tag}: expect digest {h1}, got {h2}"
                            ));
                        }
                        Verdict::Equal
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Invoke, Return, SqlError, Stmt, StmtFlags};
    use chrono::{DateTime, Utc};
    use resultset::ResultSet;

    fn times(offset: i64) -> [DateTime<Utc>; 2] {
        [
            DateTime::from_timestamp_nanos(offset),
            DateTime::from_timestamp_nanos(offset + 1_000_000),
        ]
    }

    fn select(unordered: bool) -> Stmt {
        let stmt = Stmt::new("SELECT * FROM t").with_flags(StmtFlags::QUERY);
        if unordered {
            stmt.with_flags(StmtFlags::UNORDERED)
        } else {
            stmt
        }
    }

    fn table(rows: &[[&str; 2]]) -> ResultSet {
        let mut rs = ResultSet::new(["c1", "c2"]);
        for row in rows {
            rs.push_text_row(row.iter().map(|c| Some(*c)));
        }
        rs
    }

    fn ok(session: &str, stmt: Stmt, res: ResultSet) -> Event {
        Event::new_return(session, Return::ok(stmt, times(0), res))
    }

    fn failed(code: i64, message: &str) -> Event {
        Event::new_return("s1", Return::err(select(false), times(0), SqlError::new(code, message)))
    }

    #[test]
    fn test_reflexive() {
        let events: Vec<Event> = vec![
            Event::new_block("s1"),
            Event::new_resume("s1"),
            Event::new_invoke("s1", Invoke::new("s1", select(true))),
            ok("s1", select(false), table(&[["1", "a"]])),
            ok("s1", Stmt::new("DELETE FROM t"), ResultSet::exec(1, 0)),
            failed(-1, "whatever"),
            failed(1062, "dup"),
        ];
        for event in &events {
            assert!(event.equal_to(event, None).is_equal(), "{:?}", event.meta());
        }
    }

    #[test]
    fn test_meta_mismatch() {
        let a: Event = Event::new_block("s1");
        let verdict = a.equal_to(&Event::new_resume("s1"), None);
        let msg = verdict.diagnostic().unwrap();
        assert!(msg.contains("Block") && msg.contains("Resume"), "{msg}");

        assert!(!a.equal_to(&Event::new_block("s2"), None).is_equal());
    }

    #[test]
    fn test_invoke_stmt_mismatch() {
        let a: Event = Event::new_invoke("s1", Invoke::new("s1", Stmt::new("SELECT 1")));
        let b = Event::new_invoke("s1", Invoke::new("s1", Stmt::new("SELECT 2")));
        let verdict = a.equal_to(&b, None);
        assert!(verdict.diagnostic().unwrap().starts_with("s1:invoke(SELECT 1): "));

        let flagged = Event::new_invoke(
            "s1",
            Invoke::new("s1", Stmt::new("SELECT 1").with_flags(StmtFlags::WAIT)),
        );
        assert!(!a.equal_to(&flagged, None).is_equal());
    }

    #[test]
    fn test_unordered_rows_compare_equal() {
        let a = ok("s1", select(true), table(&[["1", "a"], ["2", "b"]]));
        let b = ok("s1", select(true), table(&[["2", "b"], ["1", "a"]]));
        assert_eq!(a.equal_to(&b, None), Verdict::Equal);
    }

    #[test]
    fn test_ordered_rows_must_match_order() {
        let a = ok("s1", select(false), table(&[["1", "a"], ["2", "b"]]));
        let b = ok("s1", select(false), table(&[["2", "b"], ["1", "a"]]));
        let verdict = a.equal_to(&b, None);
        assert!(verdict.diagnostic().unwrap().contains("expect digest"));

        let sorted = DigestOptions { sort: true };
        assert!(a.equal_to(&b, Some(&sorted)).is_equal());
    }

    #[test]
    fn test_swapped_columns_differ_even_unordered() {
        let a = ok("s1", select(true), table(&[["1", "a"], ["2", "b"]]));
        let b = ok("s1", select(true), table(&[["a", "1"], ["2", "b"]]));
        let verdict = a.equal_to(&b, None);
        assert!(!verdict.is_equal());
        assert!(verdict.diagnostic().unwrap().contains("digest"));
    }

    #[test]
    fn test_error_codes() {
        assert!(failed(1062, "Duplicate entry '1'").equal_to(&failed(1062, "Duplicate entry '2'"), None).is_equal());
        assert!(!failed(1062, "x").equal_to(&failed(1064, "x"), None).is_equal());
        assert!(failed(-1, "timeout").equal_to(&failed(-1, "timeout"), None).is_equal());

        let verdict = failed(-1, "timeout").equal_to(&failed(-1, "reset"), None);
        assert_eq!(
            verdict.diagnostic(),
            Some("s1:return(SELECT * FROM t): expect (E-1: timeout), got (E-1: reset)")
        );
    }

    #[test]
    fn test_unclassified_rule_checks_expected_side_only() {
        // Codes must match first, so a message mismatch only matters for
        // the unclassified code of the expected event.
        assert!(failed(0, "a").equal_to(&failed(0, "b"), None).is_equal());
        assert!(!failed(-1, "a").equal_to(&failed(0, "a"), None).is_equal());
    }

    #[test]
    fn test_error_vs_ok() {
        let err = failed(1062, "dup");
        let res = ok("s1", select(false), table(&[["1", "a"]]));
        assert!(err.equal_to(&res, None).diagnostic().unwrap().ends_with("got ok"));
        assert!(res
            .equal_to(&err, None)
            .diagnostic()
            .unwrap()
            .ends_with("expect a result, got (E1062: dup)"));
    }

    #[test]
    fn test_exec_vs_rows() {
        let exec = ok("s1", select(false), ResultSet::exec(0, 0));
        let rows = ok("s1", select(false), table(&[]));
        let verdict = exec.equal_to(&rows, None);
        assert_eq!(
            verdict.diagnostic(),
            Some("s1:return(SELECT * FROM t): expect [affected rows: 0, last insert id: 0], got [0 rows in set (2 cols)]")
        );
    }

    #[test]
    fn test_exec_results_ignore_counts() {
        let a = ok("s1", Stmt::new("UPDATE t SET c2 = 'x'"), ResultSet::exec(1, 0));
        let b = ok("s1", Stmt::new("UPDATE t SET c2 = 'x'"), ResultSet::exec(3, 9));
        assert!(a.equal_to(&b, None).is_equal());
    }

    #[test]
    fn test_timestamps_are_ignored() {
        let a = ok("s1", select(false), table(&[["1", "a"]]));
        let b = Event::new_return("s1", Return::ok(select(false), times(42), table(&[["1", "a"]])));
        assert!(a.equal_to(&b, None).is_equal());
    }

    #[test]
    fn test_two_engines_scenario() {
        use rusqlite::Connection;

        let setup = "CREATE TABLE t (id INTEGER, name TEXT);
                     INSERT INTO t VALUES (1, 'a'), (2, 'b');";
        let s1 = Connection::open_in_memory().unwrap();
        let s2 = Connection::open_in_memory().unwrap();
        s1.execute_batch(setup).unwrap();
        s2.execute_batch(setup).unwrap();

        let stmt = select(true);
        let r1 = resultset::sqlite::query(&s1, "SELECT * FROM t ORDER BY id").unwrap();
        let r2 = resultset::sqlite::query(&s2, "SELECT * FROM t ORDER BY id DESC").unwrap();
        let a = ok("s", stmt.clone(), r1);
        let b = ok("s", stmt.clone(), r2);
        assert!(a.equal_to(&b, None).is_equal());

        let r3 = resultset::sqlite::query(&s2, "SELECT name, id FROM t").unwrap();
        let c = ok("s", stmt, r3);
        assert!(a.equal_to(&c, None).diagnostic().unwrap().contains("expect digest"));
    }

    #[test]
    #[should_panic(expected = "has no invoke payload")]
    fn test_malformed_event_panics() {
        let good: Event = Event::new_invoke("s1", Invoke::new("s1", Stmt::new("SELECT 1")));
        let bad = Event::from_parts(good.meta().clone(), crate::Payload::None);
        let _ = good.equal_to(&bad, None);
    }
}
