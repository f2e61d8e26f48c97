//! Canonical schema constants for structured logging
//!
//! Every log line emitted through the logging facility uses these keys so
//! that detection runs can be filtered and joined downstream.

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Record identifiers
pub const FIELD_USER_ID: &str = "user_id";
pub const FIELD_CAMPUS_ID: &str = "campus_id";
pub const FIELD_SCOPE: &str = "scope";
pub const FIELD_STAGE: &str = "stage";

// Batch counters
pub const FIELD_RECORDS: &str = "records";
pub const FIELD_EMITTED: &str = "emitted";
pub const FIELD_REJECTED_MOVES: &str = "rejected_moves";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
