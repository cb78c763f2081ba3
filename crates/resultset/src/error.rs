//! Result-set error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to encode result set: {0}")]
    Encode(#[source] postcard::Error),

    #[error("failed to decode result set: {0}")]
    Decode(#[source] postcard::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
