//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the blog store.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Foreign keys are enforced on every connection handed out.
//! - No blog data is read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_db_with_options, DbOptions};

pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while opening or migrating a blog database.
#[derive(Debug)]
pub enum DbError {
    /// The database file or in-memory handle could not be opened.
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// Connection pragmas or the busy timeout could not be applied.
    Configure(rusqlite::Error),
    /// A schema migration step failed; the schema stays at its prior version.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// On-disk schema was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Any other SQLite failure on a bootstrapped connection.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => write!(f, "cannot open {mode} blog database: {source}"),
            Self::Configure(err) => write!(f, "cannot configure blog database connection: {err}"),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "blog schema migration {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Configure(err) | Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
