use scorelog_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and the HTTP layer's status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    MissingField,
    InvalidPartition,

    // Backend
    /// Network engine probe failed and fallback was not permitted
    BackendUnavailable,
    /// Create-if-missing of the reports table or its index failed
    SchemaBootstrap,
    Persistence,

    // Integration/IO
    Io,
    Config,
    Timeout,
    Serialization,

    // Auth
    Unauthorised,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::InvalidPartition => "ERR_INVALID_PARTITION",
            ExErrorKind::BackendUnavailable => "ERR_BACKEND_UNAVAILABLE",
            ExErrorKind::SchemaBootstrap => "ERR_SCHEMA_BOOTSTRAP",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind describes bad caller input rather than a server fault
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput | ExErrorKind::MissingField | ExErrorKind::InvalidPartition
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus
/// context (operation, partition, request) for operators.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    partition: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            partition: None,
            field: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add month partition context
    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }

    /// Add offending input field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
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

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn is_validation(&self) -> bool {
        self.kind.is_validation()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn partition(&self) -> Option<&str> {
        self.partition.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
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
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(partition) = &self.partition {
            write!(f, " (partition: {})", partition)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Caller-input failures raised while normalizing submissions and partitions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    // ===== Validation Errors =====
    /// Required field absent or null
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// Required text field present but blank
    #[error("Field {field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Field {field} is not an integer: {value}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("Field {field} is not a boolean: {value}")]
    NotABoolean { field: &'static str, value: String },

    #[error("Field {field} is not text: {value}")]
    NotText { field: &'static str, value: String },

    /// Partition string is not `YYYY-MM`
    #[error("Invalid month partition: {value}")]
    InvalidPartition { value: String },
}

impl From<ReportError> for ExError {
    fn from(err: ReportError) -> Self {
        let message = err.to_string();
        match err {
            ReportError::MissingField { field } => ExError::new(ExErrorKind::MissingField)
                .with_field(field)
                .with_message(message),

            ReportError::EmptyField { field }
            | ReportError::NotAnInteger { field, .. }
            | ReportError::NotABoolean { field, .. }
            | ReportError::NotText { field, .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_field(field)
                .with_message(message),

            ReportError::InvalidPartition { value } => {
                ExError::new(ExErrorKind::InvalidPartition)
                    .with_partition(value)
                    .with_message("Partition must be formatted as YYYY-MM")
            }
        }
    }
}
