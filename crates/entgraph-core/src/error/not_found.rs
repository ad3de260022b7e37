use super::Error;

/// A single-entity operation matched no rows.
#[derive(Debug)]
pub(super) struct NotFoundError {
    label: Box<str>,
}

impl std::error::Error for NotFoundError {}

impl core::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} not found", self.label)
    }
}

impl Error {
    /// Creates a not-found error for the entity with the given label.
    pub fn not_found(label: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NotFound(NotFoundError {
            label: label.into().into(),
        }))
    }

    /// Returns `true` if this error is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NotFound(_))
    }
}
