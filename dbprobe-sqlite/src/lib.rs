//! # dbprobe-sqlite
//!
//! SQLite [`Connector`](dbprobe_core::Connector) built on `tokio-rusqlite`.
//!
//! The probe opens an existing database file without creating it, checks
//! that the file really is a database and closes it again. A missing file
//! therefore fails the probe instead of leaving an empty database behind.

pub mod connector;
pub mod error;

pub use connector::{SqliteConnector, open_flags};
pub use error::{SqliteError, SqliteResult};
