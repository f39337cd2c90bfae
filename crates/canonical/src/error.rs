use thiserror::Error;

/// Errors that can occur during canonicalization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The tree holds a construct the value-stripping pass refuses to
    /// normalize. No partial fingerprint is produced for such input.
    #[error("unsupported construct: {construct}")]
    UnsupportedConstruct { construct: String },
}
