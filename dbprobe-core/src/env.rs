//! Environment variable expansion for configuration text.
//!
//! Supported forms:
//! - `${VAR}` fails when `VAR` is unset
//! - `${VAR:-default}` falls back to `default` when unset or empty
//! - `${VAR:?message}` fails with `message` when unset or empty
//! - `$VAR`
//!
//! Only configuration files are expanded. Connection URLs received in
//! requests are used exactly as given.

use std::collections::HashMap;

use crate::error::{ConfigError, ConfigResult};

/// Where variable values come from.
pub trait EnvSource: Send + Sync {
    /// Look up a variable.
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Expands variable references in text.
#[derive(Debug, Clone, Default)]
pub struct EnvExpander<S: EnvSource = ProcessEnv> {
    source: S,
}

impl EnvExpander<ProcessEnv> {
    /// Expander over the process environment.
    pub fn new() -> Self {
        Self { source: ProcessEnv }
    }
}

impl<S: EnvSource> EnvExpander<S> {
    /// Expander over a custom source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Expand every reference in `input`.
    pub fn expand(&self, input: &str) -> ConfigResult<String> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(braced) = after.strip_prefix('{') {
                let end = braced.find('}').ok_or_else(|| ConfigError::InvalidEnvValue {
                    name: braced.to_string(),
                    message: "unterminated '${'".to_string(),
                })?;
                out.push_str(&self.resolve_braced(&braced[..end])?);
                rest = &braced[end + 1..];
            } else if after.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
                let len = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                let name = &after[..len];
                let value = self
                    .source
                    .get(name)
                    .ok_or_else(|| ConfigError::EnvNotFound(name.to_string()))?;
                out.push_str(&value);
                rest = &after[len..];
            } else {
                out.push('$');
                rest = after;
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    fn resolve_braced(&self, expr: &str) -> ConfigResult<String> {
        let (name, modifier) = match expr.split_once(':') {
            Some((name, modifier)) => (name, Some(modifier)),
            None => (expr, None),
        };
        if name.is_empty() {
            return Err(ConfigError::InvalidEnvValue {
                name: String::new(),
                message: "empty variable name".to_string(),
            });
        }

        let value = self.source.get(name).filter(|v| !v.is_empty());
        match (value, modifier) {
            (Some(value), _) => Ok(value),
            (None, Some(m)) if m.starts_with('-') => Ok(m[1..].to_string()),
            (None, Some(m)) if m.starts_with('?') => Err(ConfigError::InvalidEnvValue {
                name: name.to_string(),
                message: match &m[1..] {
                    "" => format!("required variable '{name}' is not set"),
                    msg => msg.to_string(),
                },
            }),
            (None, _) => Err(ConfigError::EnvNotFound(name.to_string())),
        }
    }
}
