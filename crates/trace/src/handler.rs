//! Per-event callbacks.
//!
//! A handler consumes one event at a time. [`History::collector`](crate::History::collector)
//! and [`text_dumper`] are the two built-in handlers; [`compose`] fans one
//! event stream out to several of them.

use crate::{Event, TextDumpOptions};
use resultset::{ResultData, ResultSet};
use std::io::{self, Write};

/// A boxed event handler.
pub type Handler<'a, R = ResultSet> = Box<dyn FnMut(&Event<R>) -> io::Result<()> + 'a>;

/// A handler that renders each event as text into `w`.
pub fn text_dumper<'a, R, W>(
    mut w: W,
    opts: TextDumpOptions,
) -> impl FnMut(&Event<R>) -> io::Result<()> + 'a
where
    R: ResultData + 'a,
    W: Write + 'a,
{
    move |event| {
        event.dump_text(&mut w, &opts).map_err(|e| match e {
            crate::Error::Io(io) => io,
            other => io::Error::other(other),
        })
    }
}

/// A handler that passes each event to every handler in order.
///
/// Stops at the first handler that fails.
pub fn compose<'a, R: 'a>(
    mut handlers: Vec<Handler<'a, R>>,
) -> impl FnMut(&Event<R>) -> io::Result<()> + 'a {
    move |event| {
        for handler in handlers.iter_mut() {
            handler(event)?;
        }
        Ok(())
    }
}
