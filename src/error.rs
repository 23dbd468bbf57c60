// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DigestError>;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository clone failed: {0}")]
    Clone(String),

    #[error("Repository read failed: {0}")]
    Read(String),

    #[error("Cursor state error: {0}")]
    Cursor(String),

    #[error("Summarization failed: {0}")]
    Summary(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DigestError {
    /// First line of the message, for inline error markers in the report.
    pub fn first_line(&self) -> String {
        self.to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_truncates_multiline_git_errors() {
        let err = DigestError::Clone("remote unreachable\nhint: check the URL".to_string());
        assert_eq!(
            err.first_line(),
            "Repository clone failed: remote unreachable"
        );
    }
}
