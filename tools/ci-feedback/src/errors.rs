use thiserror::Error;

#[derive(Debug, Error)]
pub enum CiFeedbackError {
    #[error("io error: {0}")]
    Io(String),
    #[error("cli error: {0}")]
    Cli(String),
    #[error("manifest parse error: {0}")]
    ManifestParse(String),
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),
    #[error("comments parse error: {0}")]
    CommentsParse(String),
}
