//! Shared MongoDB error mapping for repository adapters.

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use tracing::debug;

/// Map a driver error into the repository's query/connection constructors.
///
/// Transport-level failures (server selection, DNS, I/O, authentication)
/// become connection errors; everything else is a query error.
pub fn map_mongo_error<E, Q, C>(error: MongoError, query: Q, connection: C) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    debug!(%error, "mongodb operation failed");
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { message, .. } => connection(message.clone()),
        ErrorKind::DnsResolve { message, .. } => connection(message.clone()),
        ErrorKind::Authentication { message, .. } => connection(message.clone()),
        ErrorKind::ConnectionPoolCleared { message, .. } => connection(message.clone()),
        ErrorKind::Io(io) => connection(io.to_string()),
        _ => query(error.to_string()),
    }
}

/// Whether the error is a unique-index violation (duplicate key).
pub fn is_duplicate_key(error: &MongoError) -> bool {
    const DUPLICATE_KEY: i32 = 11000;
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
        _ => false,
    }
}
