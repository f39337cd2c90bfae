//! Flat lexing on top of the `sqlparser` tokenizer.
//!
//! Produces one [`Token::Leaf`] per lexical token, whitespace and comments
//! included, so the exact source text is preserved leaf by leaf.

use sqlparser::dialect::Dialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Location, Token as SqlToken, TokenWithSpan, Tokenizer, Whitespace};

use crate::error::ParseError;
use crate::token::{LeafKind, Token};

pub(crate) fn lex(dialect: &dyn Dialect, sql: &str) -> Result<Vec<Token>, ParseError> {
    let tokens = Tokenizer::new(dialect, sql)
        .tokenize_with_location()
        .map_err(|err| ParseError::Tokenize {
            message: err.to_string(),
        })?;

    let lines = LineIndex::new(sql);
    Ok(tokens
        .into_iter()
        .filter_map(|TokenWithSpan { token, span }| {
            let source = lines.slice(sql, span.start, span.end);
            classify(token, source)
        })
        .collect())
}

/// Maps tokenizer locations (1-based line, 1-based char column) back to
/// byte offsets.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(sql: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(sql.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { starts }
    }

    fn offset(&self, sql: &str, location: Location) -> Option<usize> {
        let line = usize::try_from(location.line).ok()?.checked_sub(1)?;
        let column = usize::try_from(location.column).ok()?.checked_sub(1)?;
        let start = *self.starts.get(line)?;
        sql.get(start..)?
            .char_indices()
            .map(|(idx, _)| start + idx)
            .chain(std::iter::once(sql.len()))
            .nth(column)
    }

    fn slice<'a>(&self, sql: &'a str, start: Location, end: Location) -> Option<&'a str> {
        let from = self.offset(sql, start)?;
        let to = self.offset(sql, end)?;
        sql.get(from..to).filter(|text| !text.is_empty())
    }
}

/// Classifies one tokenizer token. The leaf keeps `source` when the span
/// could be resolved, else the token's own rendering.
fn classify(token: SqlToken, source: Option<&str>) -> Option<Token> {
    let rendered = token.to_string();
    let kind = match &token {
        SqlToken::EOF => return None,
        SqlToken::Whitespace(
            Whitespace::SingleLineComment { .. } | Whitespace::MultiLineComment(_),
        ) => LeafKind::Comment,
        SqlToken::Whitespace(_) => LeafKind::Whitespace,
        SqlToken::Word(word) => {
            if word.quote_style.is_some() {
                LeafKind::QuotedName
            } else if is_word_operator(&word.value) {
                LeafKind::ComparisonOperator
            } else if word.keyword == Keyword::NoKeyword {
                LeafKind::Name
            } else {
                LeafKind::Keyword
            }
        }
        SqlToken::Number(..) => LeafKind::Number,
        SqlToken::Placeholder(_) => LeafKind::Placeholder,
        SqlToken::SingleQuotedString(_)
        | SqlToken::DoubleQuotedString(_)
        | SqlToken::NationalStringLiteral(_)
        | SqlToken::EscapedStringLiteral(_)
        | SqlToken::HexStringLiteral(_) => LeafKind::String,
        _ => classify_symbol(&rendered),
    };
    let text = source.map_or(rendered, str::to_string);
    Some(Token::leaf(kind, text))
}

fn is_word_operator(word: &str) -> bool {
    word.eq_ignore_ascii_case("LIKE") || word.eq_ignore_ascii_case("ILIKE")
}

fn classify_symbol(text: &str) -> LeafKind {
    match text {
        "=" | "==" | "<>" | "!=" | "<" | ">" | "<=" | ">=" | "<=>" | ":=" => {
            LeafKind::ComparisonOperator
        }
        "," | "." | ";" | "(" | ")" | "[" | "]" | "{" | "}" | ":" | "::" => LeafKind::Punctuation,
        // Remaining literal flavours (dollar quoted, byte strings, ...).
        t if t.ends_with('\'') || (t.starts_with("$") && t.ends_with('$') && t.len() > 1) => {
            LeafKind::String
        }
        _ => LeafKind::Operator,
    }
}
