//! The capability set the trace layer needs from a result container.

use std::fmt;
use std::io;

/// Options controlling [`ResultData::data_digest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigestOptions {
    /// Digest rows in canonical order instead of the order they were returned.
    pub sort: bool,
}

/// A statement result as seen by trace recording and comparison.
///
/// Implementations own their binary encoding and digest algorithm; callers
/// only rely on `decode(encode(r))` digesting identically to `r`.
pub trait ResultData: Sized + fmt::Display {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encode the result into an opaque byte blob.
    fn encode(&self) -> Result<Vec<u8>, Self::Error>;

    /// Decode a blob produced by [`ResultData::encode`].
    fn decode(raw: &[u8]) -> Result<Self, Self::Error>;

    /// Whether this is an exec result, carrying no row data.
    fn is_exec_result(&self) -> bool;

    fn n_rows(&self) -> usize;

    fn n_cols(&self) -> usize;

    /// Raw bytes of a cell. `None` for NULL or out-of-range positions.
    fn raw_value(&self, row: usize, col: usize) -> Option<&[u8]>;

    /// Fixed-size digest of the row data, as lowercase hex.
    fn data_digest(&self, opts: &DigestOptions) -> String;

    /// Render the result as a multi-line table, each line ending in `\n`.
    fn pretty_print(&self, w: &mut dyn io::Write) -> io::Result<()>;
}
