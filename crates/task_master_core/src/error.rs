use std::fmt;

/// Verdicts from the schema validator. The first three variants are schema
/// violations (shape of the payload); `InvalidStatus` is its own kind so the
/// caller can tell a malformed payload from an unrecognized status value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(&'static str),
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    EmptyField(&'static str),
    InvalidStatus(String),
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) | Self::WrongType { .. } | Self::EmptyField(_) => "schema_error",
            Self::InvalidStatus(_) => "invalid_status",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field '{field}'"),
            Self::WrongType { field, expected } => {
                write!(f, "field '{field}' must be {expected}")
            }
            Self::EmptyField(field) => write!(f, "field '{field}' must not be empty"),
            Self::InvalidStatus(value) => {
                write!(f, "'{value}' is not one of OPEN, DONE, CANCELLED")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by the task store. `InvalidTask` carries the validation
/// cause so adapters can report what was wrong with the payload; the rest
/// distinguish a missing task from persistence failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    InvalidTask(ValidationError),
    NotFound(String),
    Io(String),
    InvalidData(String),
}

impl StoreError {
    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTask(_) => "invalid_task",
            Self::NotFound(_) => "not_found",
            Self::Io(_) => "io_error",
            Self::InvalidData(_) => "invalid_data",
        }
    }

    /// True when the error is the caller's fault (bad payload), as opposed
    /// to a missing task or an internal persistence failure.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::InvalidTask(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTask(cause) => write!(f, "invalid task: {cause}"),
            Self::NotFound(id) => write!(f, "task '{id}' not found"),
            Self::Io(message) => write!(f, "io_error - {message}"),
            Self::InvalidData(message) => write!(f, "invalid_data - {message}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidTask(cause) => Some(cause),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(cause: ValidationError) -> Self {
        Self::InvalidTask(cause)
    }
}
