//! dbprobe CLI - resolve connection URLs and probe database connectivity.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

/// Exit status when the probe ran and failed.
pub const EXIT_PROBE_FAILED: i32 = 2;
