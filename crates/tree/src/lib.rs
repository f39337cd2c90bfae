//! SQL token trees.
//!
//! This crate defines the tree a SQL statement is parsed into before it is
//! canonicalized and fingerprinted, plus a default parser producing it.
//!
//! ## Tree shape
//!
//! - [`Token::Leaf`] keeps one lexical token and its exact source text,
//!   whitespace and comments included
//! - [`Token::Group`] keeps an ordered list of children and a [`GroupKind`]
//!
//! ## Parsing
//!
//! [`StatementParser`] is the only thing downstream stages depend on. The
//! bundled [`SqlTokenParser`] lexes with `sqlparser` and then groups tokens
//! into parentheses, dotted identifiers, functions, comparisons,
//! assignments, identifier lists and `WHERE` clauses. Only the first
//! statement of a multi-statement input is returned by
//! [`StatementParser::parse`].
//!
//! ```rust
//! use tree::{parse, GroupKind};
//!
//! let stmt = parse("SELECT a FROM t WHERE x = 1").unwrap();
//! assert_eq!(stmt.group_kind(), Some(GroupKind::Statement));
//! assert!(stmt.contains_group(GroupKind::Comparison));
//! ```

mod config;
mod error;
mod grouping;
mod lexer;
mod parser;
mod token;

pub use crate::config::{ParserConfig, SqlDialect};
pub use crate::error::ParseError;
pub use crate::parser::{parse, SqlTokenParser, StatementParser};
pub use crate::token::{GroupKind, LeafKind, Leaves, Token};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_source_text_in_leaves() {
        let sql = "SELECT  a,\n b FROM t WHERE x = 'v' AND y != 2 -- note\n";
        let stmt = parse(sql).expect("parse");
        let rebuilt: String = stmt.leaves().filter_map(Token::text).collect();
        assert_eq!(rebuilt, sql);
    }

    #[test]
    fn parse_uses_first_statement_only() {
        let stmt = parse("SELECT a FROM t; DELETE FROM t").expect("parse");
        assert!(!stmt.leaves().any(|t| t.is_keyword("DELETE")));
        assert!(stmt.leaves().any(|t| t.is_punctuation(";")));
    }

    #[test]
    fn parse_statements_returns_all() {
        let parser = SqlTokenParser::default();
        let stmts = parser
            .parse_statements("SELECT 1; SELECT 2")
            .expect("parse");
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn empty_input_rejected() {
        assert_eq!(parse("  -- only a comment\n"), Err(ParseError::EmptyStatement));
        assert_eq!(parse(""), Err(ParseError::EmptyStatement));
    }

    #[test]
    fn zero_nesting_depth_rejected() {
        let cfg = ParserConfig {
            max_nesting_depth: 0,
            ..Default::default()
        };
        assert!(matches!(
            SqlTokenParser::new(cfg),
            Err(ParseError::InvalidConfig(_))
        ));
    }

    #[test]
    fn dialect_names_parse() {
        assert_eq!(SqlDialect::from_name("Postgres"), Some(SqlDialect::PostgreSql));
        assert_eq!(SqlDialect::from_name("mysql"), Some(SqlDialect::MySql));
        assert_eq!(SqlDialect::from_name("oracle"), None);
    }

    #[test]
    fn boxed_parser_delegates() {
        let parser: Box<dyn StatementParser> = Box::new(SqlTokenParser::default());
        assert!(parser.parse("SELECT 1").is_ok());
    }
}
