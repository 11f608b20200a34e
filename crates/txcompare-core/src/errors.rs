use thiserror::Error;

/// Result type alias using TxCompareError
pub type Result<T> = std::result::Result<T, TxCompareError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidRecord,
    NotFound,

    // Rule set
    InvalidRuleSet,
    DuplicateRuleId,
    RuleFailed,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidRecord => "ERR_INVALID_RECORD",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidRuleSet => "ERR_INVALID_RULE_SET",
            ExErrorKind::DuplicateRuleId => "ERR_DUPLICATE_RULE_ID",
            ExErrorKind::RuleFailed => "ERR_RULE_FAILED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, record, rule, input line) for diagnostics.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    record_id: Option<String>,
    rule_id: Option<String>,
    line: Option<u64>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            record_id: None,
            rule_id: None,
            line: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add record ID context
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Add rule ID context
    pub fn with_rule_id(mut self, id: impl Into<String>) -> Self {
        self.rule_id = Some(id.into());
        self
    }

    /// Add input line context (1-based)
    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the record ID context, if any
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    /// Get the rule ID context, if any
    pub fn rule_id(&self) -> Option<&str> {
        self.rule_id.as_deref()
    }

    /// Get the input line context, if any
    pub fn line(&self) -> Option<u64> {
        self.line
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
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
        if let Some(record_id) = &self.record_id {
            write!(f, " (record_id: {})", record_id)?;
        }
        if let Some(rule_id) = &self.rule_id {
            write!(f, " (rule_id: {})", rule_id)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {})", line)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for comparison operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TxCompareError {
    /// An input line could not be decoded as a comparison record
    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    /// A tolerance rule failed while matching or normalizing
    #[error("Rule {rule_id} failed on record {record_id}: {reason}")]
    RuleFailed {
        rule_id: String,
        record_id: String,
        reason: String,
    },

    /// The rule set definition is malformed
    #[error("Invalid rule set: {reason}")]
    InvalidRuleSet { reason: String },

    /// Two rules share an id
    #[error("Duplicate rule id: {rule_id}")]
    DuplicateRuleId { rule_id: String },

    /// A required job file is missing
    #[error("Missing job file: {path}")]
    MissingJobFile { path: String },

    /// Serialization error (JSON/TOML encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// I/O failure while reading input or writing output
    #[error("I/O error during {op}: {message}")]
    Io { op: String, message: String },
}

impl From<TxCompareError> for ExError {
    fn from(err: TxCompareError) -> Self {
        match err {
            TxCompareError::InvalidRecord { line, reason } => {
                ExError::new(ExErrorKind::InvalidRecord)
                    .with_line(line)
                    .with_message(reason)
            }
            TxCompareError::RuleFailed {
                rule_id,
                record_id,
                reason,
            } => ExError::new(ExErrorKind::RuleFailed)
                .with_rule_id(rule_id)
                .with_record_id(record_id)
                .with_message(reason),
            TxCompareError::InvalidRuleSet { reason } => {
                ExError::new(ExErrorKind::InvalidRuleSet).with_message(reason)
            }
            TxCompareError::DuplicateRuleId { rule_id } => {
                ExError::new(ExErrorKind::DuplicateRuleId)
                    .with_rule_id(rule_id)
                    .with_message("Rule ids must be unique within a rule set")
            }
            TxCompareError::MissingJobFile { path } => ExError::new(ExErrorKind::NotFound)
                .with_message(format!("Required job file not found: {}", path)),
            TxCompareError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            TxCompareError::Io { op, message } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to TxCompareError
impl From<serde_json::Error> for TxCompareError {
    fn from(err: serde_json::Error) -> Self {
        TxCompareError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from toml::de::Error to TxCompareError
impl From<toml::de::Error> for TxCompareError {
    fn from(err: toml::de::Error) -> Self {
        TxCompareError::InvalidRuleSet {
            reason: err.to_string(),
        }
    }
}
