use thiserror::Error;

/// Translation error type
///
/// Every variant renders as a human-readable reason that the presentation
/// layer can show verbatim.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Model API key is not configured; set GEMINI_API_KEY in the environment or .env file")]
    NotConfigured,

    #[error("Model call failed: {0}")]
    CollaboratorFailure(String),

    #[error("Generated SQL did not pass validation: {0}")]
    ValidationRejected(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl TranslateError {
    /// Short machine-friendly name of the error kind, used in logs and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::NotConfigured => "not_configured",
            TranslateError::CollaboratorFailure(_) => "collaborator_failure",
            TranslateError::ValidationRejected(_) => "validation_rejected",
            TranslateError::Schema(_) => "schema",
            TranslateError::TaskJoin(_) => "task_join",
        }
    }
}

/// Result type alias for translation results
pub type Result<T> = std::result::Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_is_rendered_verbatim() {
        let err = TranslateError::ValidationRejected("SELECT;".to_string());
        assert_eq!(
            err.to_string(),
            "Generated SQL did not pass validation: SELECT;"
        );
        assert_eq!(err.kind(), "validation_rejected");
    }

    #[test]
    fn test_not_configured_mentions_key() {
        let err = TranslateError::NotConfigured;
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert_eq!(err.kind(), "not_configured");
    }
}
