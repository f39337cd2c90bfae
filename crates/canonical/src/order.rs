//! Alphabetical reordering pass.
//!
//! Children of every group are sorted by their rendered text (see
//! [`Token::render`]), after being ordered themselves. Comparison is plain
//! `str` ordering, so it is case-sensitive. The sort is stable: children
//! rendering to equal text keep their relative order.
//!
//! The result is deliberately not valid SQL. Projection columns, join
//! operands and the keywords of a clause all end up reordered; the tree
//! only has to be a stable key for the query's shape.

use tree::Token;

/// Recursively sorts every group's children by rendered text.
pub fn order_alphabetically(token: Token) -> Token {
    match token {
        Token::Leaf { .. } => token,
        Token::Group { kind, children } => {
            let mut children: Vec<Token> =
                children.into_iter().map(order_alphabetically).collect();
            children.sort_by_cached_key(Token::render);
            Token::group(kind, children)
        }
    }
}
