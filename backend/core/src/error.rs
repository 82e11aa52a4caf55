use thiserror::Error;

/// Top-level error type for the Folio content core.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("HTML parsing is not available in this environment")]
    ParserUnavailable,

    #[error("HTML parse error: {0}")]
    Parse(String),

    #[error("asset reference rejected: {0}")]
    AssetRejected(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl FolioError {
    /// Shorthand for building an [`FolioError::InvalidDocument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidDocument(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        assert_eq!(
            FolioError::invalid("text node without a \"text\" string").to_string(),
            "invalid document: text node without a \"text\" string"
        );
        assert_eq!(
            FolioError::AssetRejected("/etc/passwd".into()).to_string(),
            "asset reference rejected: /etc/passwd"
        );
    }
}
