use std::error::Error;

/// Turns the `Result` of a `try_` method into the value returned by its panicking counterpart.
pub(crate) trait ResultExtension<T> {
    /// Unwraps the value, or panics with the [`Display`](std::fmt::Display) message of the error
    /// rather than its [`Debug`] form. Panics are reported at the caller of the public method, not
    /// here.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    fn throw(self) -> T;
}

impl<T, E: Error> ResultExtension<T> for Result<T, E> {
    #[track_caller]
    fn throw(self) -> T {
        match self {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(%error, "infallible operation failed");
                panic!("{error}")
            },
        }
    }
}
