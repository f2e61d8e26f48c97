//! Baseline-vs-current change extraction.
//!
//! ## Guarantees
//!
//! - **Baseline-driven**: only fields (or paths) known to the baseline and
//!   still present in the current record are compared. Fields that appear
//!   for the first time are not changes.
//! - **Strict equality**: values are compared structurally with no type
//!   coercion; `5` and `"5"` differ.
//! - **No no-ops**: every emitted change has `old != new`, so extracting a
//!   record against itself yields nothing.

pub mod extract;
pub mod path;

pub use extract::{extract, extract_paths, extract_with};
pub use path::{ChangePath, Container, PathError};
