use super::Error;

/// Error when storage rejected a write because of a constraint (unique,
/// foreign key, not null).
///
/// The storage error is kept as the cause, so the full message reads
/// `constraint failed: <driver message>`.
#[derive(Debug)]
pub(super) struct ConstraintError;

impl std::error::Error for ConstraintError {}

impl core::fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("constraint failed")
    }
}

impl Error {
    /// Wraps a storage-reported error as a constraint error.
    pub fn constraint(cause: Error) -> Error {
        cause.context(Error::from(super::ErrorKind::Constraint(ConstraintError)))
    }

    /// Returns `true` if this error is a constraint error.
    pub fn is_constraint(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Constraint(_))
    }
}
