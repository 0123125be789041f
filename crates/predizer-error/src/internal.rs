#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    #[error("Task failed to join: {0}")]
    TaskJoin(String),
}
