//! Unified error types for squall.
//!
//! Every failure the worker can observe is represented here. Policies
//! translate most of these into a fallback path or a log line rather than
//! letting them reach the page.

use tokio_rusqlite::rusqlite;

/// Unified error types for the squall workspace.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A manifest entry could not be fetched or stored during install.
    #[error("INSTALL_FAILED: {url}: {reason}")]
    Install { url: String, reason: String },

    /// A live fetch failed outright (DNS, connect, reset).
    #[error("NETWORK_UNAVAILABLE: {0}")]
    NetworkUnavailable(String),

    /// The bounded fetch deadline elapsed before a response arrived.
    #[error("FETCH_TIMEOUT: {0}")]
    Timeout(String),

    /// A response body exceeded the configured size cap.
    #[error("FETCH_TOO_LARGE: {0}")]
    TooLarge(String),

    /// A request URL or manifest path failed to parse or resolve.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// A lifecycle hook was invoked from the wrong state.
    #[error("LIFECYCLE_ERROR: cannot {event} while {state}")]
    Lifecycle { state: String, event: String },

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored snapshot could not be encoded or decoded.
    #[error("STORE_ERROR: snapshot encoding: {0}")]
    Encoding(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
