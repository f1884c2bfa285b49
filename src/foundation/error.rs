pub type ReelResult<T> = Result<T, ReelError>;

/// Error type shared by every reel building block.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ReelError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ReelError::invalid_argument("x")
                .to_string()
                .contains("invalid argument:")
        );
        assert!(ReelError::font("x").to_string().contains("font error:"));
        assert!(
            ReelError::evaluation("x")
                .to_string()
                .contains("evaluation error:")
        );
        assert!(
            ReelError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ReelError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
