use thiserror::Error;

/// Errors produced while turning SQL text into a token tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid parser configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to tokenize SQL: {message}")]
    Tokenize { message: String },
    #[error("input contains no SQL statement")]
    EmptyStatement,
    #[error("unbalanced parenthesis at token {position}")]
    UnbalancedParenthesis { position: usize },
    #[error("parenthesis nesting exceeds limit of {limit}")]
    NestingTooDeep { limit: usize },
}
