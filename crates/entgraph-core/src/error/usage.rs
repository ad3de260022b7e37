use super::Error;

/// The caller used a builder or mutation in a way its state does not allow,
/// e.g. reading an old value after save or writing an immutable field.
#[derive(Debug)]
pub(super) struct UsageError {
    message: Box<str>,
}

impl std::error::Error for UsageError {}

impl core::fmt::Display for UsageError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates a usage error.
    pub fn usage(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Usage(UsageError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a usage error.
    pub fn is_usage(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Usage(_))
    }
}
