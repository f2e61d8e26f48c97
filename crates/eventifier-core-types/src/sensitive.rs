//! Redacting wrapper for secrets
//!
//! Fingerprint keys are loaded from configuration and must never reach a log
//! line or an error message. `Sensitive<T>` redacts itself in `Debug` and
//! `Display` and deserializes transparently from the inner value.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Wrapper for secret data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use eventifier_core_types::Sensitive;
///
/// let key = Sensitive::new("internal-hmac-key");
/// assert_eq!(format!("{:?}", key), "***REDACTED***");
/// assert_eq!(key.expose(), &"internal-hmac-key");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying secret
    ///
    /// Only the fingerprinter should need this.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Sensitive)
    }
}
