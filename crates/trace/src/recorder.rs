//! Recording events from concurrently running sessions.
//!
//! [`History::append`](crate::History::append) is not synchronized. Sessions
//! on different threads each hold a clone of a [`Recorder`] and send their
//! events to a single [`Collector`], which owns the history.

use crate::{Error, Event, History, Invoke, Result, Return, Stmt};
use crossbeam_channel::{Receiver, Sender, unbounded};
use resultset::ResultSet;
use std::io;
use tracing::{debug, trace};

/// Create a connected recorder/collector pair.
pub fn recorder<R>() -> (Recorder<R>, Collector<R>) {
    let (tx, rx) = unbounded();
    (Recorder { tx }, Collector { rx })
}

/// Sending side, one clone per session.
#[derive(Debug)]
pub struct Recorder<R = ResultSet> {
    tx: Sender<Event<R>>,
}

impl<R> Clone for Recorder<R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<R> Recorder<R> {
    pub fn record(&self, event: Event<R>) -> Result<()> {
        trace!(meta = %event.meta(), "recording event");
        self.tx.send(event).map_err(|_| Error::RecorderClosed)
    }

    pub fn block(&self, session: &str) -> Result<()> {
        self.record(Event::new_block(session))
    }

    pub fn resume(&self, session: &str) -> Result<()> {
        self.record(Event::new_resume(session))
    }

    pub fn invoke(&self, session: &str, stmt: Stmt) -> Result<()> {
        self.record(Event::new_invoke(session, Invoke::new(session, stmt)))
    }

    pub fn ret(&self, session: &str, ret: Return<R>) -> Result<()> {
        self.record(Event::new_return(session, ret))
    }
}

/// Receiving side. Events arrive in the order they were sent.
#[derive(Debug)]
pub struct Collector<R = ResultSet> {
    rx: Receiver<Event<R>>,
}

impl<R> Collector<R> {
    /// Move every event received so far into `history` without waiting.
    pub fn drain_into(&self, history: &mut History<R>) -> usize {
        let mut n = 0;
        for event in self.rx.try_iter() {
            history.append(event);
            n += 1;
        }
        n
    }

    /// Wait until every recorder is dropped and return the full history.
    pub fn finish(self) -> History<R> {
        let history: History<R> = self.rx.iter().collect();
        debug!(events = history.len(), "recording finished");
        history
    }

    /// Pass every event to `handler` until every recorder is dropped.
    ///
    /// Returns the number of events handled.
    pub fn run<F>(self, mut handler: F) -> Result<usize>
    where
        F: FnMut(&Event<R>) -> io::Result<()>,
    {
        let mut n = 0;
        for event in self.rx.iter() {
            handler(&event)?;
            n += 1;
        }
        debug!(events = n, "recording finished");
        Ok(n)
    }
}
