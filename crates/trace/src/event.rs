//! Session-level trace events.

use crate::{Error, Invoke, Result, Return};
use resultset::ResultSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// The session was suspended by the scheduler.
    Block,
    /// The session was allowed to continue.
    Resume,
    /// The session submitted a statement.
    Invoke,
    /// A statement's outcome became available.
    Return,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Block => "block",
            Kind::Resume => "resume",
            Kind::Invoke => "invoke",
            Kind::Return => "return",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which session emitted an event, and what kind it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventMeta {
    pub kind: Kind,
    pub session: String,
}

impl EventMeta {
    pub fn new(kind: Kind, session: impl Into<String>) -> Self {
        Self {
            kind,
            session: session.into(),
        }
    }
}

impl fmt::Display for EventMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.session, self.kind)
    }
}

/// Data attached to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<R = ResultSet> {
    None,
    Invoke(Invoke),
    Return(Return<R>),
}

impl<R> Payload<R> {
    fn name(&self) -> &'static str {
        match self {
            Payload::None => "empty",
            Payload::Invoke(_) => "invoke",
            Payload::Return(_) => "return",
        }
    }
}

/// A single trace event.
///
/// Block and resume events carry no payload, invoke events carry an
/// [`Invoke`] and return events a [`Return`]. The constructors uphold this;
/// [`Event::from_parts`] does not, and such events are rejected by the
/// encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<R = ResultSet> {
    meta: EventMeta,
    payload: Payload<R>,
}

impl<R> Event<R> {
    pub fn new_block(session: impl Into<String>) -> Self {
        Self::from_parts(EventMeta::new(Kind::Block, session), Payload::None)
    }

    pub fn new_resume(session: impl Into<String>) -> Self {
        Self::from_parts(EventMeta::new(Kind::Resume, session), Payload::None)
    }

    pub fn new_invoke(session: impl Into<String>, inv: Invoke) -> Self {
        Self::from_parts(EventMeta::new(Kind::Invoke, session), Payload::Invoke(inv))
    }

    pub fn new_return(session: impl Into<String>, ret: Return<R>) -> Self {
        Self::from_parts(EventMeta::new(Kind::Return, session), Payload::Return(ret))
    }

    /// Assemble an event without checking that the payload fits the kind.
    pub fn from_parts(meta: EventMeta, payload: Payload<R>) -> Self {
        Self { meta, payload }
    }

    pub fn meta(&self) -> &EventMeta {
        &self.meta
    }

    pub fn kind(&self) -> Kind {
        self.meta.kind
    }

    pub fn session(&self) -> &str {
        &self.meta.session
    }

    pub fn payload(&self) -> &Payload<R> {
        &self.payload
    }

    /// Check that the payload matches the event kind.
    pub fn validate(&self) -> Result<()> {
        match (self.meta.kind, &self.payload) {
            (Kind::Block | Kind::Resume, Payload::None)
            | (Kind::Invoke, Payload::Invoke(_))
            | (Kind::Return, Payload::Return(_)) => Ok(()),
            (kind @ (Kind::Invoke | Kind::Return), Payload::None) => {
                Err(Error::MissingPayload { kind })
            }
            (kind, payload) => Err(Error::PayloadMismatch {
                kind,
                payload: payload.name(),
            }),
        }
    }

    pub fn try_invoke(&self) -> Option<&Invoke> {
        match (&self.meta.kind, &self.payload) {
            (Kind::Invoke, Payload::Invoke(inv)) => Some(inv),
            _ => None,
        }
    }

    pub fn try_ret(&self) -> Option<&Return<R>> {
        match (&self.meta.kind, &self.payload) {
            (Kind::Return, Payload::Return(ret)) => Some(ret),
            _ => None,
        }
    }

    /// The invoke payload.
    ///
    /// # Panics
    ///
    /// Panics if this is not a well-formed invoke event.
    pub fn invoke(&self) -> &Invoke {
        match self.try_invoke() {
            Some(inv) => inv,
            None => panic!(
                "{} event has no invoke payload (carries {})",
                self.meta,
                self.payload.name()
            ),
        }
    }

    /// The return payload.
    ///
    /// # Panics
    ///
    /// Panics if this is not a well-formed return event.
    pub fn ret(&self) -> &Return<R> {
        match self.try_ret() {
            Some(ret) => ret,
            None => panic!(
                "{} event has no return payload (carries {})",
                self.meta,
                self.payload.name()
            ),
        }
    }
}
