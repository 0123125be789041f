#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}
