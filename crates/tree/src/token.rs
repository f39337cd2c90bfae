//! Token tree model.
//!
//! A parsed SQL statement is a tree of [`Token`]s. Leaves carry the exact
//! source text of one lexical token; groups carry an ordered list of child
//! tokens and a [`GroupKind`] describing what the children form together.
//!
//! # Rendering
//!
//! Every token has one rendering, used both for display and as the sort key
//! of the canonical ordering pass:
//!
//! - a leaf renders to its text
//! - a group renders to its children's renderings joined by a single space
//!
//! ```rust
//! use tree::{GroupKind, LeafKind, Token};
//!
//! let cmp = Token::group(
//!     GroupKind::Comparison,
//!     vec![
//!         Token::leaf(LeafKind::Name, "x"),
//!         Token::leaf(LeafKind::ComparisonOperator, "="),
//!         Token::leaf(LeafKind::Number, "1"),
//!     ],
//! );
//! assert_eq!(cmp.render(), "x = 1");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lexical classification of a leaf token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    /// Reserved or non-reserved SQL keyword (`SELECT`, `WHERE`, `NULL`).
    Keyword,
    /// Unquoted identifier.
    Name,
    /// Quoted identifier (`"col"`, `` `col` ``, `[col]`).
    QuotedName,
    Number,
    /// String literal of any flavour, quotes included.
    String,
    /// Bind parameter (`?`, `$1`, `:name`).
    Placeholder,
    /// Operator that makes a comparison or assignment (`=`, `<>`, `LIKE`).
    ComparisonOperator,
    /// Any other operator (`+`, `*`, `||`).
    Operator,
    /// Structural punctuation (`,`, `.`, `;`, parentheses).
    Punctuation,
    /// Spaces, tabs and newlines.
    Whitespace,
    /// Line or block comment.
    Comment,
}

/// What the children of a group form together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Root of one parsed statement.
    Statement,
    /// `(` ... `)`, including both parenthesis leaves.
    Parenthesis,
    /// Dotted name such as `schema.table.col`.
    Identifier,
    /// Comma separated items.
    IdentifierList,
    /// Name directly followed by a parenthesis.
    Function,
    /// `WHERE` keyword and its predicate.
    Where,
    /// Arithmetic or concatenation expression (`a + 1`, `'x' || y`, `- 3`).
    Operation,
    /// Predicate `left OP right`.
    Comparison,
    /// `col = value` inside a `SET` clause, or `name := value`.
    Assignment,
}

impl GroupKind {
    /// Stable snake_case name, used by canonical serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKind::Statement => "statement",
            GroupKind::Parenthesis => "parenthesis",
            GroupKind::Identifier => "identifier",
            GroupKind::IdentifierList => "identifier_list",
            GroupKind::Function => "function",
            GroupKind::Where => "where",
            GroupKind::Operation => "operation",
            GroupKind::Comparison => "comparison",
            GroupKind::Assignment => "assignment",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the token tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
    Leaf { kind: LeafKind, text: String },
    Group { kind: GroupKind, children: Vec<Token> },
}

impl Token {
    pub fn leaf(kind: LeafKind, text: impl Into<String>) -> Self {
        Token::Leaf {
            kind,
            text: text.into(),
        }
    }

    pub fn group(kind: GroupKind, children: Vec<Token>) -> Self {
        Token::Group { kind, children }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Token::Group { .. })
    }

    /// True for leaves made only of whitespace. Comments are not whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(
            self,
            Token::Leaf {
                kind: LeafKind::Whitespace,
                ..
            }
        )
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            Token::Leaf {
                kind: LeafKind::Comment,
                ..
            }
        )
    }

    /// Whitespace or comment: tokens with no bearing on query structure.
    pub fn is_trivia(&self) -> bool {
        self.is_whitespace() || self.is_comment()
    }

    pub fn leaf_kind(&self) -> Option<LeafKind> {
        match self {
            Token::Leaf { kind, .. } => Some(*kind),
            Token::Group { .. } => None,
        }
    }

    pub fn group_kind(&self) -> Option<GroupKind> {
        match self {
            Token::Leaf { .. } => None,
            Token::Group { kind, .. } => Some(*kind),
        }
    }

    /// Leaf text, `None` for groups.
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Leaf { text, .. } => Some(text.as_str()),
            Token::Group { .. } => None,
        }
    }

    /// Child tokens; empty for leaves.
    pub fn children(&self) -> &[Token] {
        match self {
            Token::Leaf { .. } => &[],
            Token::Group { children, .. } => children.as_slice(),
        }
    }

    /// True if this is a keyword leaf matching `word` case-insensitively.
    pub fn is_keyword(&self, word: &str) -> bool {
        match self {
            Token::Leaf {
                kind: LeafKind::Keyword,
                text,
            } => text.eq_ignore_ascii_case(word),
            _ => false,
        }
    }

    /// True if this is a punctuation leaf with exactly `text`.
    pub fn is_punctuation(&self, punct: &str) -> bool {
        matches!(
            self,
            Token::Leaf { kind: LeafKind::Punctuation, text } if text == punct
        )
    }

    /// Rendered text of the token; see the module docs for the rule.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Token::Leaf { text, .. } => out.push_str(text),
            Token::Group { children, .. } => {
                for (idx, child) in children.iter().enumerate() {
                    if idx > 0 {
                        out.push(' ');
                    }
                    child.render_into(out);
                }
            }
        }
    }

    /// Depth of the tree rooted here; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Token::Leaf { .. } => 1,
            Token::Group { children, .. } => {
                1 + children.iter().map(Token::depth).max().unwrap_or(0)
            }
        }
    }

    /// Depth-first iterator over all leaves, in tree order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// True if any group in the tree has the given kind.
    pub fn contains_group(&self, kind: GroupKind) -> bool {
        match self {
            Token::Leaf { .. } => false,
            Token::Group {
                kind: own,
                children,
            } => *own == kind || children.iter().any(|c| c.contains_group(kind)),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Iterator returned by [`Token::leaves`].
pub struct Leaves<'a> {
    stack: Vec<&'a Token>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(token) = self.stack.pop() {
            match token {
                Token::Leaf { .. } => return Some(token),
                Token::Group { children, .. } => self.stack.extend(children.iter().rev()),
            }
        }
        None
    }
}
