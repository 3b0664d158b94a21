//! Crate error type.
//!
//! Evaluating an event never fails. Errors only come from building a custom
//! [`ProtectedCommandSet`](crate::ProtectedCommandSet) or from installing an
//! adapter into global logging state.

/// Errors raised while configuring or installing the filter.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("protected command prefix must not be empty")]
    EmptyPrefix,

    #[error("protected command prefix {0:?} must end with a delimiter")]
    MissingDelimiter(String),

    #[cfg(feature = "tracing")]
    #[error("failed to install the global tracing subscriber")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
