pub mod classify;
pub mod detect;

use eventifier_core::config::resolve_internal_campus_id;
use eventifier_core::errors::ExError;

/// `--campus`, then the campus env vars, then the default
pub fn internal_campus_id(explicit: Option<i64>) -> Result<i64, ExError> {
    resolve_internal_campus_id(explicit, |var| std::env::var(var).ok()).map_err(ExError::from)
}
