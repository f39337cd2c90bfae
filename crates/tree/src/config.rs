//! Configuration for the default SQL parser.
//!
//! ```rust
//! use tree::{ParserConfig, SqlDialect};
//!
//! let config = ParserConfig {
//!     dialect: SqlDialect::PostgreSql,
//!     ..Default::default()
//! };
//! assert_eq!(config.max_nesting_depth, 128);
//! ```

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{
    AnsiDialect, Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
    SQLiteDialect,
};

/// SQL dialect used by the tokenizer.
///
/// Dialects differ mostly in identifier quoting and placeholder syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Generic,
    #[serde(rename = "postgresql")]
    PostgreSql,
    #[serde(rename = "mysql")]
    MySql,
    Sqlite,
    #[serde(rename = "mssql")]
    MsSql,
    Ansi,
}

impl SqlDialect {
    pub(crate) fn dialect(self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Generic => Box::new(GenericDialect {}),
            SqlDialect::PostgreSql => Box::new(PostgreSqlDialect {}),
            SqlDialect::MySql => Box::new(MySqlDialect {}),
            SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
            SqlDialect::MsSql => Box::new(MsSqlDialect {}),
            SqlDialect::Ansi => Box::new(AnsiDialect {}),
        }
    }

    /// Parse a dialect name as written in config files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "generic" => Some(SqlDialect::Generic),
            "postgresql" | "postgres" => Some(SqlDialect::PostgreSql),
            "mysql" => Some(SqlDialect::MySql),
            "sqlite" => Some(SqlDialect::Sqlite),
            "mssql" => Some(SqlDialect::MsSql),
            "ansi" => Some(SqlDialect::Ansi),
            _ => None,
        }
    }
}

/// Configuration for [`SqlTokenParser`](crate::SqlTokenParser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Tokenizer dialect.
    #[serde(default)]
    pub dialect: SqlDialect,

    /// Maximum parenthesis nesting accepted before parsing fails.
    ///
    /// Every pass over the tree recurses once per nesting level, so this
    /// bounds stack usage for hostile inputs. Must be >= 1.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

fn default_max_nesting_depth() -> usize {
    128
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            dialect: SqlDialect::Generic,
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}
