use super::{ErrorPolicy, Result};

/// Extension trait for `Result` enabling policy-driven emission without
/// contaminating core control-flow with side-effects.
///
/// Example
/// ```rust,ignore
/// use predizer_error::{Result, ResultExt, ErrorPolicy, DomainError};
///
/// fn do_work(policy: &impl ErrorPolicy) -> Result<()> {
///     let r: Result<()> = Err(DomainError::Io { message: "stdin closed".into() }.into());
///     r.emit_event(policy) // Emitted according to policy, still Err for caller to handle
/// }
/// ```
pub trait ResultExt<T> {
    /// Emit the error using the provided policy and return the result unchanged
    fn emit_event(self, policy: &impl ErrorPolicy) -> Self;
}

impl<T> ResultExt<T> for Result<T> {
    fn emit_event(self, policy: &impl ErrorPolicy) -> Self {
        if let Err(ref e) = self {
            policy.emit(e);
        }
        self
    }
}
