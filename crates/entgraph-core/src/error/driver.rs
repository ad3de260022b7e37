use super::Error;

/// Error reported by a storage executor.
#[derive(Debug)]
pub(super) struct DriverError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
    /// Set when the executor classified the failure as a constraint violation.
    pub(super) constraint: bool,
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from an executor-specific error.
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Driver(DriverError {
            inner: Box::new(err),
            constraint: false,
        }))
    }

    /// Creates an executor error that storage reported as a constraint
    /// violation. Builders re-wrap these with [`Error::constraint`].
    pub fn driver_constraint(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Driver(DriverError {
            inner: Box::new(err),
            constraint: true,
        }))
    }

    /// Returns `true` if this error is an executor error.
    pub fn is_driver(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Driver(_))
    }

    /// Returns `true` if this error is an executor error flagged as a
    /// constraint violation.
    pub fn is_driver_constraint(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Driver(err) if err.constraint)
    }
}
