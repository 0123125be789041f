#[derive(Debug, thiserror::Error)]
pub enum WarningError {
    /// A response arrived but could not be turned into a rendered message.
    #[error("Unhandled response (status {status:?}): {message}")]
    UnhandledResponse { status: Option<u16>, message: String },

    #[error("Request body could not be encoded: {0}")]
    RequestEncoding(String),
}
