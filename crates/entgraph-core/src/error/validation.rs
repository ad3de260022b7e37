use super::Error;

/// Error when a field or edge fails a pre-save check.
#[derive(Debug)]
pub(super) struct ValidationError {
    /// Field or edge name the failure is scoped to.
    name: Box<str>,
    message: Box<str>,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "validation failed: {}", self.message)
    }
}

impl Error {
    /// Creates a validation error scoped to the named field or edge.
    pub fn validation(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            name: name.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Validation(_))
    }

    /// Returns the field or edge name of a validation error.
    pub fn validation_name(&self) -> Option<&str> {
        match self.kind() {
            super::ErrorKind::Validation(err) => Some(&err.name),
            _ => None,
        }
    }
}
