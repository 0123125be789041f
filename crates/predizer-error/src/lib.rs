pub mod domain;
pub mod fatal;
pub mod internal;
pub mod policy;
pub mod result_ext;
pub mod severity;
pub mod warning;

// public exports
pub use domain::DomainError;
pub use fatal::FatalError;
pub use internal::InternalError;
pub use policy::ErrorPolicy;
#[cfg(feature = "tracing")]
pub use policy::TracingPolicy;
pub use result_ext::ResultExt;
pub use severity::Severity;
pub use warning::WarningError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fatal(#[from] FatalError),
    #[error(transparent)]
    Warning(#[from] WarningError),
    #[error(transparent)]
    Internal(#[from] InternalError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl Error {
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::Warning(_))
    }

    /// Default classification used by the policies in [`policy`].
    pub fn severity(&self) -> Severity {
        match self {
            Error::Fatal(_) => Severity::Fatal,
            Error::Warning(_) => Severity::Warning,
            Error::Internal(_) | Error::Domain(_) => Severity::Error,
        }
    }
}
