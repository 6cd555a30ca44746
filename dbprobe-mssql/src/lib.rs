//! # dbprobe-mssql
//!
//! Microsoft SQL Server [`Connector`](dbprobe_core::Connector) built on
//! `tiberius` over a tokio TCP stream.
//!
//! The probe logs in with SQL Server authentication, runs `SELECT 1` and
//! closes the connection.

pub mod config;
pub mod connector;
pub mod error;

pub use config::to_tiberius_config;
pub use connector::MssqlConnector;
pub use error::{MssqlError, MssqlResult};
