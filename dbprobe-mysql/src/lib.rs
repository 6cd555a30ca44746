//! # dbprobe-mysql
//!
//! MySQL and MariaDB [`Connector`](dbprobe_core::Connector) built on
//! `mysql_async`.
//!
//! The probe opens a single connection (never a pool), sends `COM_PING`
//! and disconnects.
//!
//! ```rust,no_run
//! use dbprobe_core::Prober;
//! use dbprobe_mysql::MysqlConnector;
//!
//! let prober = Prober::builder().connector(MysqlConnector::new()).build();
//! ```

pub mod config;
pub mod connector;
pub mod error;

pub use config::to_opts;
pub use connector::MysqlConnector;
pub use error::{MysqlError, MysqlResult};
