//! Detector configuration.
//!
//! Resolved once per run into an immutable [`DetectorConfig`] that every
//! component borrows. Nothing downstream reads the environment.
//!
//! The document format:
//!
//! ```json
//! {
//!   "internals": {"fields": ["login", "wallet", "location"]},
//!   "externals": {"fields": []},
//!   "hmac_keys": {"internal": "...", "external": "..."}
//! }
//! ```
//!
//! An empty external field list falls back to the internal list.

use crate::errors::{EventifierError, Result};
use crate::model::campus::{Scope, DEFAULT_INTERNAL_CAMPUS_ID};
use eventifier_core_types::Sensitive;
use serde::{Deserialize, Serialize};

/// Env vars consulted for the internal campus id, in order
pub const CAMPUS_ID_ENV_VARS: [&str; 2] = ["CAMPUS_ID", "INTERNAL_CAMPUS_ID"];

/// How changes are addressed and which rule set applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Top-level field names; core rules only
    #[default]
    Fields,
    /// Dotted/bracketed leaf paths; adds coalition, ignore-suffix, container
    /// and cross-campus noise rules
    Paths,
}

#[derive(Debug, Default, Deserialize)]
struct RawFieldSet {
    #[serde(default)]
    fields: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawKeys {
    #[serde(default)]
    internal: Option<Sensitive<String>>,
    #[serde(default)]
    external: Option<Sensitive<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    internals: Option<RawFieldSet>,
    #[serde(default)]
    externals: Option<RawFieldSet>,
    #[serde(default)]
    hmac_keys: Option<RawKeys>,
}

/// Field list and key for one scope
#[derive(Debug, Clone)]
pub struct ScopeConfig {
    pub fields: Vec<String>,
    pub key: Sensitive<String>,
}

/// Fully resolved, immutable detector configuration
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub internal: ScopeConfig,
    pub external: ScopeConfig,
    pub internal_campus_id: i64,
    pub granularity: Granularity,
}

fn require_key(key: Option<Sensitive<String>>, what: &str) -> Result<Sensitive<String>> {
    match key {
        Some(key) if !key.expose().is_empty() => Ok(key),
        _ => Err(EventifierError::ConfigurationMissing {
            what: what.to_string(),
        }),
    }
}

impl DetectorConfig {
    /// Parse the field/key document.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if the text is not a JSON object of the expected shape
    /// - `ConfigurationMissing` if the internal field list or either key is absent or empty
    pub fn from_json_str(text: &str, internal_campus_id: i64) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_str(text).map_err(|e| EventifierError::InvalidConfiguration {
                reason: format!("detector field config is not valid: {}", e),
            })?;

        let internal_fields = raw.internals.map(|s| s.fields).unwrap_or_default();
        if internal_fields.is_empty() {
            return Err(EventifierError::ConfigurationMissing {
                what: "internals.fields".to_string(),
            });
        }
        let external_fields = match raw.externals.map(|s| s.fields) {
            Some(fields) if !fields.is_empty() => fields,
            _ => internal_fields.clone(),
        };

        let keys = raw.hmac_keys.unwrap_or_default();
        let internal_key = require_key(keys.internal, "hmac_keys.internal")?;
        let external_key = require_key(keys.external, "hmac_keys.external")?;

        Ok(Self {
            internal: ScopeConfig {
                fields: internal_fields,
                key: internal_key,
            },
            external: ScopeConfig {
                fields: external_fields,
                key: external_key,
            },
            internal_campus_id,
            granularity: Granularity::default(),
        })
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Field list and key for a scope
    pub fn scope(&self, scope: Scope) -> &ScopeConfig {
        match scope {
            Scope::Internal => &self.internal,
            Scope::External => &self.external,
        }
    }
}

/// Resolve the internal campus id: explicit override, then the first set
/// env var in [`CAMPUS_ID_ENV_VARS`], then the default (21).
///
/// `lookup` abstracts the environment so callers and tests can inject it.
///
/// # Errors
///
/// Returns `InvalidConfiguration` if a consulted env var is set but not an integer.
pub fn resolve_internal_campus_id<F>(explicit: Option<i64>, lookup: F) -> Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(id) = explicit {
        return Ok(id);
    }
    for var in CAMPUS_ID_ENV_VARS {
        if let Some(value) = lookup(var) {
            return value
                .trim()
                .parse()
                .map_err(|_| EventifierError::InvalidConfiguration {
                    reason: format!("{} must be an integer campus id, got `{}`", var, value),
                });
        }
    }
    Ok(DEFAULT_INTERNAL_CAMPUS_ID)
}
