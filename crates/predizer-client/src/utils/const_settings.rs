/// Endpoint the form posts to when nothing else is configured.
pub const DEFAULT_PREDICT_URL: &str = "http://localhost:8004/predizer";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Upper bound on body text copied into error diagnostics.
pub const BODY_SNIPPET_MAX: usize = 2_000;
