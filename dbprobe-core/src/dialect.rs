//! Dialect registry.
//!
//! Maps case-insensitive scheme aliases onto immutable [`DialectProfile`]s.
//! The process-wide registry is built once on first use and never mutated.
//!
//! ```rust
//! use dbprobe_core::{DialectRegistry, DriverId};
//!
//! let registry = DialectRegistry::global();
//! let pg = registry.lookup("PostgreSQL").unwrap();
//! assert_eq!(pg.name, "pg");
//! assert_eq!(pg.default_port, Some(5432));
//! assert_eq!(pg.driver_id, DriverId::Postgres);
//!
//! assert!(registry.lookup("foobar").is_none());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};

/// Identifies the driver family that can probe a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverId {
    /// PostgreSQL wire protocol.
    Postgres,
    /// MySQL / MariaDB protocol.
    MySql,
    /// Microsoft SQL Server (TDS).
    Mssql,
    /// SQLite database file.
    Sqlite,
}

impl DriverId {
    /// Get the driver name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Mssql => "mssql",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a dialect keeps its data, which decides the required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    /// Reached over the network; host and database name are required.
    Network,
    /// A local database file; only the file path is required.
    File,
}

/// Engine defaults for one dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialectProfile {
    /// Canonical dialect name recorded in every canonical config.
    pub name: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Accepted aliases, lowercase.
    pub url_scheme_aliases: &'static [&'static str],
    /// Port used when neither the body nor the URL names one.
    pub default_port: Option<u16>,
    /// Driver able to probe this dialect.
    pub driver_id: DriverId,
    /// Storage model.
    pub storage: Storage,
}

impl DialectProfile {
    /// Whether this dialect connects over the network.
    pub fn is_network(&self) -> bool {
        self.storage == Storage::Network
    }
}

const BUILTIN_PROFILES: &[DialectProfile] = &[
    DialectProfile {
        name: "pg",
        label: "PostgreSQL",
        url_scheme_aliases: &["pg", "postgres", "postgresql"],
        default_port: Some(5432),
        driver_id: DriverId::Postgres,
        storage: Storage::Network,
    },
    DialectProfile {
        name: "mysql2",
        label: "MySQL",
        url_scheme_aliases: &["mysql2", "mysql", "mariadb"],
        default_port: Some(3306),
        driver_id: DriverId::MySql,
        storage: Storage::Network,
    },
    DialectProfile {
        name: "mssql",
        label: "SQL Server",
        url_scheme_aliases: &["mssql", "sqlserver"],
        default_port: Some(1433),
        driver_id: DriverId::Mssql,
        storage: Storage::Network,
    },
    DialectProfile {
        name: "sqlite3",
        label: "SQLite",
        url_scheme_aliases: &["sqlite3", "sqlite"],
        default_port: None,
        driver_id: DriverId::Sqlite,
        storage: Storage::File,
    },
];

static GLOBAL_REGISTRY: LazyLock<DialectRegistry> = LazyLock::new(DialectRegistry::builtin);

/// Read-only alias table.
#[derive(Debug, Clone)]
pub struct DialectRegistry {
    profiles: Vec<DialectProfile>,
    by_alias: HashMap<String, usize>,
}

impl DialectRegistry {
    /// Build a registry from profiles.
    ///
    /// # Panics
    ///
    /// Panics when two profiles claim the same alias. The table is static
    /// data, so a collision is a build defect rather than a runtime input.
    pub fn new(profiles: Vec<DialectProfile>) -> Self {
        let mut by_alias = HashMap::new();
        for (idx, profile) in profiles.iter().enumerate() {
            for alias in profile.url_scheme_aliases {
                let previous = by_alias.insert(alias.to_ascii_lowercase(), idx);
                assert!(
                    previous.is_none(),
                    "dialect alias '{alias}' registered twice"
                );
            }
        }
        Self { profiles, by_alias }
    }

    /// The registry of supported dialects.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_PROFILES.to_vec())
    }

    /// Process-wide registry, initialized once.
    pub fn global() -> &'static DialectRegistry {
        &GLOBAL_REGISTRY
    }

    /// Find the profile for an alias (case-insensitive).
    pub fn lookup(&self, alias: &str) -> Option<&DialectProfile> {
        self.by_alias
            .get(&alias.trim().to_ascii_lowercase())
            .map(|&idx| &self.profiles[idx])
    }

    /// Like [`lookup`](Self::lookup) but fails with `UnsupportedDialect`.
    pub fn resolve(&self, alias: &str) -> ResolveResult<&DialectProfile> {
        self.lookup(alias)
            .ok_or_else(|| ResolveError::unsupported_dialect(alias.trim()))
    }

    /// All profiles in registration order.
    pub fn profiles(&self) -> &[DialectProfile] {
        &self.profiles
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
