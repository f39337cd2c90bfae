//! Whitespace removal pass.
//!
//! Drops every whitespace leaf below a group, at every depth. Comments are
//! dropped too when requested. A whitespace leaf passed in as the root is
//! returned unchanged: only children are ever removed.
//!
//! # Examples
//!
//! ```rust
//! use canonical::strip_whitespace;
//!
//! let stmt = tree::parse("SELECT  a\n  FROM t").unwrap();
//! let stripped = strip_whitespace(stmt, true);
//! assert_eq!(stripped.render(), "SELECT a FROM t");
//! ```

use tree::Token;

/// Removes whitespace (and optionally comment) leaves from every group.
pub fn strip_whitespace(token: Token, strip_comments: bool) -> Token {
    match token {
        Token::Leaf { .. } => token,
        Token::Group { kind, children } => {
            let children = children
                .into_iter()
                .filter(|child| !(child.is_whitespace() || (strip_comments && child.is_comment())))
                .map(|child| strip_whitespace(child, strip_comments))
                .collect();
            Token::group(kind, children)
        }
    }
}
