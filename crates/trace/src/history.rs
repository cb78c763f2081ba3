//! Ordered event sequences.

use crate::codec::Record;
use crate::{Event, Result, TextDumpOptions, Verdict};
use resultset::{DigestOptions, ResultData, ResultSet};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::io::{self, Read, Write};
use tracing::debug;

/// Options for [`History::dump_json`].
///
/// With both fields empty the history is written on one line. Otherwise every
/// element starts on a new line made of `prefix` followed by one `indent` per
/// nesting level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonDumpOptions {
    pub prefix: String,
    pub indent: String,
}

/// The events of one run, in the order they were recorded.
///
/// Appending is not synchronized. Sessions running on several threads should
/// record through a [`Recorder`](crate::Recorder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent, bound(serialize = "R: ResultData", deserialize = "R: ResultData"))]
pub struct History<R = ResultSet> {
    events: Vec<Event<R>>,
}

impl<R> Default for History<R> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<R> History<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: Event<R>) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event<R>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event<R>> {
        self.events.iter()
    }

    /// A handler that appends a copy of every event it sees.
    pub fn collector(&mut self) -> impl FnMut(&Event<R>) -> io::Result<()> + '_
    where
        R: Clone,
    {
        move |event| {
            self.append(event.clone());
            Ok(())
        }
    }
}

impl<R: ResultData> History<R> {
    /// Parse a history written by [`History::dump_json`].
    pub fn load(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the history as a JSON array followed by a newline.
    pub fn dump_json(&self, w: &mut dyn Write, opts: &JsonDumpOptions) -> Result<()> {
        let records = self
            .events
            .iter()
            .map(Event::to_record)
            .collect::<Result<Vec<Record>>>()?;

        let mut buf = Vec::new();
        if opts.prefix.is_empty() && opts.indent.is_empty() {
            serde_json::to_writer(&mut buf, &records)?;
        } else {
            let formatter = PrettyFormatter::with_indent(opts.indent.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            records.serialize(&mut ser)?;
        }

        // Serialized strings escape newlines, so every raw one is a line break.
        let mut out = Vec::with_capacity(buf.len() + 1);
        for byte in buf {
            out.push(byte);
            if byte == b'\n' {
                out.extend_from_slice(opts.prefix.as_bytes());
            }
        }
        out.push(b'\n');
        w.write_all(&out)?;
        Ok(())
    }

    /// Render every event in order.
    pub fn dump_text(&self, w: &mut dyn Write, opts: &TextDumpOptions) -> Result<()> {
        for event in &self.events {
            event.dump_text(w, opts)?;
        }
        Ok(())
    }

    /// Compare two histories event by event, in order.
    pub fn equal_to(&self, other: &History<R>, opts: Option<&DigestOptions>) -> Verdict {
        for (i, (a, b)) in self.events.iter().zip(&other.events).enumerate() {
            if let Verdict::Differ(msg) = a.equal_to(b, opts) {
                debug!(index = i, "histories diverge");
                return Verdict::Differ(format!("event #{i}: {msg}"));
            }
        }
        if self.len() != other.len() {
            debug!(expected = self.len(), actual = other.len(), "history lengths differ");
            return Verdict::Differ(format!(
                "expect {} events, got {}",
                self.len(),
                other.len()
            ));
        }
        Verdict::Equal
    }
}

impl<R> From<Vec<Event<R>>> for History<R> {
    fn from(events: Vec<Event<R>>) -> Self {
        Self { events }
    }
}

impl<R> FromIterator<Event<R>> for History<R> {
    fn from_iter<I: IntoIterator<Item = Event<R>>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<R> IntoIterator for History<R> {
    type Item = Event<R>;
    type IntoIter = std::vec::IntoIter<Event<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a History<R> {
    type Item = &'a Event<R>;
    type IntoIter = std::slice::Iter<'a, Event<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
