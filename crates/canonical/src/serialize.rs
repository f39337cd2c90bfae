//! Canonical text serialization.
//!
//! The digest input for a normalized fingerprint. Unlike
//! [`Token::render`], group boundaries and kinds are written out, so two
//! trees with the same leaves but different structure serialize
//! differently:
//!
//! ```text
//! leaf   -> text
//! group  -> kind(child child ...)
//! ```
//!
//! ```rust
//! use canonical::serialize;
//! use tree::{GroupKind, LeafKind, Token};
//!
//! let cmp = Token::group(
//!     GroupKind::Comparison,
//!     vec![
//!         Token::leaf(LeafKind::Name, "x"),
//!         Token::leaf(LeafKind::ComparisonOperator, "="),
//!     ],
//! );
//! assert_eq!(serialize(&cmp), "comparison(x =)");
//! ```

use tree::Token;

pub fn serialize(token: &Token) -> String {
    let mut out = String::new();
    write_token(token, &mut out);
    out
}

fn write_token(token: &Token, out: &mut String) {
    match token {
        Token::Leaf { text, .. } => out.push_str(text),
        Token::Group { kind, children } => {
            out.push_str(kind.as_str());
            out.push('(');
            for (idx, child) in children.iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                write_token(child, out);
            }
            out.push(')');
        }
    }
}
