use super::Error;

/// Error when schema declarations cannot be resolved into a graph.
///
/// This occurs when:
/// - An edge names a type that was never declared
/// - An inverse edge references a missing assoc edge, or the assoc edge points
///   somewhere else
/// - An edge is required in both directions
/// - An edge-field binding or through type is malformed
/// - The derived storage layout has duplicate columns
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidSchema(_))
    }
}
