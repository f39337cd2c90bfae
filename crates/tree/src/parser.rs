//! The parsing capability consumed by the canonicalization pipeline.
//!
//! [`StatementParser`] is the seam: anything that turns SQL text into a
//! [`Token`] tree can be plugged in. [`SqlTokenParser`] is the default,
//! built on the `sqlparser` tokenizer plus this crate's grouping rules.

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::grouping::{build_statement, split_statements};
use crate::lexer::lex;
use crate::token::Token;

/// Turns SQL text into the token tree of its first statement.
pub trait StatementParser: Send + Sync {
    fn parse(&self, sql: &str) -> Result<Token, ParseError>;
}

impl<P: StatementParser + ?Sized> StatementParser for Box<P> {
    fn parse(&self, sql: &str) -> Result<Token, ParseError> {
        (**self).parse(sql)
    }
}

impl<P: StatementParser + ?Sized> StatementParser for &P {
    fn parse(&self, sql: &str) -> Result<Token, ParseError> {
        (**self).parse(sql)
    }
}

/// Default [`StatementParser`].
#[derive(Debug, Clone, Default)]
pub struct SqlTokenParser {
    config: ParserConfig,
}

impl SqlTokenParser {
    pub fn new(config: ParserConfig) -> Result<Self, ParseError> {
        if config.max_nesting_depth == 0 {
            return Err(ParseError::InvalidConfig(
                "max_nesting_depth must be >= 1".into(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses every non-empty statement in `sql`, in source order.
    pub fn parse_statements(&self, sql: &str) -> Result<Vec<Token>, ParseError> {
        let dialect = self.config.dialect.dialect();
        let leaves = lex(dialect.as_ref(), sql)?;
        split_statements(leaves)
            .into_iter()
            .map(|stmt| build_statement(stmt, self.config.max_nesting_depth))
            .collect()
    }
}

impl StatementParser for SqlTokenParser {
    fn parse(&self, sql: &str) -> Result<Token, ParseError> {
        let dialect = self.config.dialect.dialect();
        let leaves = lex(dialect.as_ref(), sql)?;
        let first = split_statements(leaves)
            .into_iter()
            .next()
            .ok_or(ParseError::EmptyStatement)?;
        build_statement(first, self.config.max_nesting_depth)
    }
}

/// Parses the first statement of `sql` with the default configuration.
pub fn parse(sql: &str) -> Result<Token, ParseError> {
    SqlTokenParser::default().parse(sql)
}
