//! Trace codec error types.

use crate::Kind;
use thiserror::Error;

/// Errors raised while encoding, decoding, or dumping traces.
///
/// Execution failures recorded in a trace are not errors at this level;
/// they travel as [`SqlError`](crate::SqlError) values inside return events.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An invoke or return event has no payload.
    #[error("{kind:?} event is missing its payload")]
    MissingPayload { kind: Kind },

    /// The payload does not match the event kind.
    #[error("{kind:?} event carries a {payload} payload")]
    PayloadMismatch { kind: Kind, payload: &'static str },

    /// A return record carries neither `error` nor `result`.
    #[error("invalid return event: `error` or `result` is missing")]
    MissingOutcome,

    /// A timestamp cannot be represented as Unix nanoseconds.
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(chrono::DateTime<chrono::Utc>),

    #[error("invalid base64 result: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The result-set capability failed to encode or decode its payload.
    #[error("result set error: {0}")]
    ResultSet(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Every recorder handle was dropped or the collector is gone.
    #[error("recorder closed")]
    RecorderClosed,

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
