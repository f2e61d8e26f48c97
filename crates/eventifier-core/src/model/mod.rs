pub mod campus;
pub mod change;
pub mod entry;
pub mod label;
pub mod queue;
pub mod record;

pub use campus::{campus_id_of, CampusId, Scope, DEFAULT_INTERNAL_CAMPUS_ID};
pub use change::Change;
pub use entry::EventLogEntry;
pub use label::EventLabel;
pub use queue::QueueEntry;
pub use record::{is_acquisition_error_value, UserId, UserRecord};
