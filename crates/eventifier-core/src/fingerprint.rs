//! Keyed identity fingerprints.
//!
//! A fingerprint answers "did anything relevant change" without a full diff:
//! the record is projected onto the scope's field list, serialized to
//! canonical JSON and signed with HMAC-SHA256 under the scope's key.
//!
//! ## Determinism guarantees
//!
//! - Same projected values + same key -> same digest, across processes
//! - Key order in the input never matters (canonical JSON sorts keys)
//! - Fields outside the field list never affect the digest
//! - `location` contributes only presence (`0`/`1`), never its value

use crate::config::DetectorConfig;
use crate::errors::{EventifierError, Result};
use crate::model::campus::Scope;
use crate::model::record::UserRecord;
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Digest of a record's projected fields under one scope's key.
///
/// Equality includes the scope, so fingerprints computed under different
/// keys never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    scope: Scope,
    hex: String,
}

impl Fingerprint {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Lowercase hex digest (64 characters)
    pub fn as_hex(&self) -> &str {
        &self.hex
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.scope, self.hex)
    }
}

/// Presence signal used for `location`: 0 for null/empty string, 1 otherwise
pub fn location_presence(value: &Value) -> Value {
    match value {
        Value::Null => Value::from(0),
        Value::String(s) if s.is_empty() => Value::from(0),
        _ => Value::from(1),
    }
}

/// Project a record onto `fields`, skipping absent fields.
///
/// The returned map is key-sorted, so its compact serialization is canonical.
pub fn project(record: &UserRecord, fields: &[String]) -> Map<String, Value> {
    let mut projected = Map::new();
    for field in fields {
        let Some(value) = record.get(field) else {
            continue;
        };
        let value = if field == "location" {
            location_presence(&value)
        } else {
            value
        };
        projected.insert(field.clone(), value);
    }
    projected
}

/// Canonical JSON of the projection: sorted keys, no whitespace
pub fn canonical_payload(record: &UserRecord, fields: &[String]) -> Result<String> {
    Ok(serde_json::to_string(&Value::Object(project(record, fields)))?)
}

/// Compute the keyed fingerprint of `record`.
///
/// # Errors
///
/// - `Serialization` if the projection cannot be encoded
/// - `FingerprintKey` if the HMAC primitive rejects the key
pub fn fingerprint(
    record: &UserRecord,
    fields: &[String],
    key: &[u8],
    scope: Scope,
) -> Result<Fingerprint> {
    let payload = canonical_payload(record, fields)?;
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| EventifierError::FingerprintKey {
        scope: scope.to_string(),
    })?;
    mac.update(payload.as_bytes());
    Ok(Fingerprint {
        scope,
        hex: hex::encode(mac.finalize().into_bytes()),
    })
}

/// Fingerprints records with the field list and key of a resolved config
pub struct Fingerprinter<'a> {
    config: &'a DetectorConfig,
}

impl<'a> Fingerprinter<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }

    /// Fingerprint under the given scope's fields and key
    ///
    /// # Errors
    ///
    /// See [`fingerprint`].
    pub fn fingerprint(&self, record: &UserRecord, scope: Scope) -> Result<Fingerprint> {
        let scope_config = self.config.scope(scope);
        fingerprint(
            record,
            &scope_config.fields,
            scope_config.key.expose().as_bytes(),
            scope,
        )
    }
}
