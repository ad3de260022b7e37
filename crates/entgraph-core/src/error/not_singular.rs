use super::Error;

/// A query expecting exactly one entity matched more than one.
#[derive(Debug)]
pub(super) struct NotSingularError {
    label: Box<str>,
}

impl std::error::Error for NotSingularError {}

impl core::fmt::Display for NotSingularError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} not singular", self.label)
    }
}

impl Error {
    /// Creates a not-singular error for the entity with the given label.
    pub fn not_singular(label: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NotSingular(NotSingularError {
            label: label.into().into(),
        }))
    }

    /// Returns `true` if this error is a not-singular error.
    pub fn is_not_singular(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NotSingular(_))
    }
}
