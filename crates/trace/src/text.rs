//! Human-readable rendering of events.

use crate::{Event, Kind, Outcome, Result};
use chrono::{DateTime, Local, Utc};
use resultset::ResultData;
use std::io::Write;

/// Options for [`Event::dump_text`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextDumpOptions {
    /// Print row-bearing results as tables.
    pub verbose: bool,
    /// Append start, end and elapsed time to successful returns.
    pub with_latency: bool,
}

impl<R: ResultData> Event<R> {
    /// Render the event as one or more lines of text.
    pub fn dump_text(&self, w: &mut dyn Write, opts: &TextDumpOptions) -> Result<()> {
        let sess = self.session();
        match self.kind() {
            Kind::Invoke => {
                let inv = self.invoke();
                if inv.stmt.sql.starts_with("/*") {
                    writeln!(w, "{}", inv.stmt.sql)?;
                } else {
                    writeln!(w, "/* {} */ {}", inv.sess, inv.stmt.sql)?;
                }
            }
            Kind::Return => {
                let ret = self.ret();
                match &ret.outcome {
                    Outcome::Error(err) => writeln!(w, "-- {sess} >> {err}")?,
                    Outcome::Result(res) => {
                        if opts.verbose && !res.is_exec_result() {
                            let mut buf = Vec::new();
                            res.pretty_print(&mut buf)?;
                            let table = String::from_utf8_lossy(&buf);
                            for (i, line) in table.lines().enumerate() {
                                let sep = if i == 0 { ">>" } else { "  " };
                                writeln!(w, "-- {sess} {sep} {line}")?;
                            }
                        } else {
                            writeln!(w, "-- {sess} >> {res}")?;
                        }
                        if opts.with_latency {
                            let cost = ret.elapsed().num_microseconds().unwrap_or(i64::MAX);
                            writeln!(
                                w,
                                "-- {sess}    {} ~ {} (cost {:.3}ms)",
                                clock(ret.t[0]),
                                clock(ret.t[1]),
                                cost as f64 / 1000.0
                            )?;
                        }
                    }
                }
            }
            Kind::Block => writeln!(w, "-- {sess} >> blocked")?,
            Kind::Resume => writeln!(w, "-- {sess} >> resumed")?,
        }
        Ok(())
    }
}

fn clock(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Invoke, Return, SqlError, Stmt};
    use resultset::ResultSet;

    fn render(event: &Event, opts: TextDumpOptions) -> String {
        let mut out = Vec::new();
        event.dump_text(&mut out, &opts).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn times() -> [DateTime<Utc>; 2] {
        [
            DateTime::from_timestamp_nanos(1_000_000_000),
            DateTime::from_timestamp_nanos(1_012_345_678),
        ]
    }

    fn rows_event() -> Event {
        let mut rs = ResultSet::new(["id"]);
        rs.push_text_row([Some("1")]);
        Event::new_return("s1", Return::ok(Stmt::new("SELECT id FROM t"), times(), rs))
    }

    #[test]
    fn test_invoke_gets_session_comment() {
        let event = Event::new_invoke("s1", Invoke::new("s1", Stmt::new("SELECT 1")));
        assert_eq!(render(&event, Default::default()), "/* s1 */ SELECT 1\n");

        let tagged = Event::new_invoke("s1", Invoke::new("s1", Stmt::new("/* init */ BEGIN")));
        assert_eq!(render(&tagged, Default::default()), "/* init */ BEGIN\n");
    }

    #[test]
    fn test_block_resume() {
        assert_eq!(render(&Event::new_block("s2"), Default::default()), "-- s2 >> blocked\n");
        assert_eq!(render(&Event::new_resume("s2"), Default::default()), "-- s2 >> resumed\n");
    }

    #[test]
    fn test_return_error_and_summary() {
        let failed = Event::new_return(
            "s1",
            Return::err(Stmt::new("INSERT"), times(), SqlError::new(1062, "dup")),
        );
        assert_eq!(render(&failed, Default::default()), "-- s1 >> E1062: dup\n");
        assert_eq!(render(&rows_event(), Default::default()), "-- s1 >> 1 rows in set (1 cols)\n");
    }

    #[test]
    fn test_verbose_table() {
        let opts = TextDumpOptions {
            verbose: true,
            with_latency: false,
        };
        let expected = "\
-- s1 >> +----+
-- s1    | id |
-- s1    +----+
-- s1    | 1  |
-- s1    +----+
";
        assert_eq!(render(&rows_event(), opts), expected);
    }

    #[test]
    fn test_latency_line() {
        let opts = TextDumpOptions {
            verbose: false,
            with_latency: true,
        };
        let text = render(&rows_event(), opts);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("-- s1    "));
        assert!(lines[1].ends_with("(cost 12.345ms)"), "{}", lines[1]);
    }
}
