use thiserror::Error;

/// Result type alias using EventifierError
pub type Result<T> = std::result::Result<T, EventifierError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code usable in tests, logs and CLI output.
/// Only the configuration and snapshot kinds are fatal for a run; every
/// record-level kind is isolated to the record that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Run-level (fatal)
    ConfigurationMissing,
    InvalidConfiguration,
    SnapshotUnreadable,

    // Record-level (isolated)
    RecordMalformed,
    /// Never propagated past the baseline store: resolves to "no baseline"
    BaselineUnreadable,
    /// Numeric delta impossible; the change lands in the unknown bucket
    ValueUncoercible,
    /// `updated_at` unusable; the run clock is used instead
    TimestampUnparseable,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ConfigurationMissing => "ERR_CONFIGURATION_MISSING",
            ExErrorKind::InvalidConfiguration => "ERR_INVALID_CONFIGURATION",
            ExErrorKind::SnapshotUnreadable => "ERR_SNAPSHOT_UNREADABLE",
            ExErrorKind::RecordMalformed => "ERR_RECORD_MALFORMED",
            ExErrorKind::BaselineUnreadable => "ERR_BASELINE_UNREADABLE",
            ExErrorKind::ValueUncoercible => "ERR_VALUE_UNCOERCIBLE",
            ExErrorKind::TimestampUnparseable => "ERR_TIMESTAMP_UNPARSEABLE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an error of this kind must stop the run before any record is processed
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExErrorKind::ConfigurationMissing
                | ExErrorKind::InvalidConfiguration
                | ExErrorKind::SnapshotUnreadable
        )
    }
}

/// Pipeline stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Snapshot,
    Record,
    Fingerprint,
    Baseline,
    Classify,
    Emit,
    Ledger,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Config => "config",
            Stage::Snapshot => "snapshot",
            Stage::Record => "record",
            Stage::Fingerprint => "fingerprint",
            Stage::Baseline => "baseline",
            Stage::Classify => "classify",
            Stage::Emit => "emit",
            Stage::Ledger => "ledger",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical structured error type
///
/// Carries the classification kind plus the context a batch operator needs:
/// which operation and stage failed, and for which user/campus.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    stage: Option<Stage>,
    user_id: Option<String>,
    campus_id: Option<i64>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            stage: None,
            user_id: None,
            campus_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add pipeline stage context
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Add user ID context
    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    /// Add campus ID context
    pub fn with_campus_id(mut self, campus_id: i64) -> Self {
        self.campus_id = Some(campus_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn campus_id(&self) -> Option<i64> {
        self.campus_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(stage) = self.stage {
            write!(f, " stage={}", stage)?;
        }
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(user_id) = &self.user_id {
            write!(f, " (user_id: {})", user_id)?;
        }
        if let Some(campus_id) = self.campus_id {
            write!(f, " (campus_id: {})", campus_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Typed error taxonomy for eventifier operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventifierError {
    /// A required configuration entry is absent or empty
    #[error("Missing configuration: {what}")]
    ConfigurationMissing { what: String },

    /// The configuration document cannot be interpreted
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A user record cannot be processed (missing id, wrong shape)
    #[error("Malformed record: {reason}")]
    RecordMalformed { reason: String },

    /// A numeric field holds a value that cannot be read as a number
    #[error("Value of {field} is not numeric: {value}")]
    ValueUncoercible { field: String, value: String },

    /// `updated_at` is present but not an ISO-8601 timestamp
    #[error("Unparseable timestamp: {value}")]
    TimestampUnparseable { value: String },

    /// The HMAC primitive refused the configured key
    #[error("Fingerprint key rejected for {scope} scope")]
    FingerprintKey { scope: String },

    /// JSON (de)serialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<EventifierError> for ExError {
    fn from(err: EventifierError) -> Self {
        match err {
            EventifierError::ConfigurationMissing { what } => {
                ExError::new(ExErrorKind::ConfigurationMissing)
                    .with_stage(Stage::Config)
                    .with_message(format!("required configuration `{}` is absent", what))
            }
            EventifierError::InvalidConfiguration { reason } => {
                ExError::new(ExErrorKind::InvalidConfiguration)
                    .with_stage(Stage::Config)
                    .with_message(reason)
            }
            EventifierError::RecordMalformed { reason } => {
                ExError::new(ExErrorKind::RecordMalformed)
                    .with_stage(Stage::Record)
                    .with_message(reason)
            }
            EventifierError::ValueUncoercible { field, value } => {
                ExError::new(ExErrorKind::ValueUncoercible)
                    .with_stage(Stage::Classify)
                    .with_message(format!("{} is not numeric: {}", field, value))
            }
            EventifierError::TimestampUnparseable { value } => {
                ExError::new(ExErrorKind::TimestampUnparseable)
                    .with_stage(Stage::Emit)
                    .with_message(format!("cannot parse updated_at `{}`", value))
            }
            EventifierError::FingerprintKey { scope } => ExError::new(ExErrorKind::Internal)
                .with_stage(Stage::Fingerprint)
                .with_message(format!("HMAC key rejected for {} scope", scope)),
            EventifierError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to EventifierError
impl From<serde_json::Error> for EventifierError {
    fn from(err: serde_json::Error) -> Self {
        EventifierError::Serialization {
            message: err.to_string(),
        }
    }
}
