//! Right-hand value stripping pass.
//!
//! Every `Comparison` group loses the operand after its operator, so
//! `x = 5` and `x = 'five'` collapse to the same shape. The pass visits the
//! whole tree: a comparison nested in a surviving operand (a subquery, a
//! function argument) is stripped as well.
//!
//! `Assignment` groups are refused outright. `SET col = value` is not a
//! predicate, and folding it into the comparison shape would let an
//! `UPDATE` collide with a `SELECT`.

use tree::{GroupKind, LeafKind, Token};

use crate::error::CanonicalError;

/// Strips right-hand operands from all comparisons in the tree.
///
/// Returns [`CanonicalError::UnsupportedConstruct`] as soon as an
/// assignment is found. Already stripped comparisons are left as they are.
pub fn strip_rhs_values(token: Token) -> Result<Token, CanonicalError> {
    match token {
        Token::Leaf { .. } => Ok(token),
        Token::Group {
            kind: GroupKind::Assignment,
            children,
        } => Err(CanonicalError::UnsupportedConstruct {
            construct: describe_assignment(&children),
        }),
        Token::Group { kind, children } => {
            let children = if kind == GroupKind::Comparison {
                drop_right_operand(children)
            } else {
                children
            };
            let children = children
                .into_iter()
                .map(strip_rhs_values)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::group(kind, children))
        }
    }
}

fn drop_right_operand(mut children: Vec<Token>) -> Vec<Token> {
    let operator = children
        .iter()
        .position(|c| c.leaf_kind() == Some(LeafKind::ComparisonOperator));
    let right = operator.and_then(|op| {
        (op + 1..children.len()).find(|&idx| !children[idx].is_trivia())
    });
    if let Some(idx) = right {
        children.remove(idx);
    }
    children
}

/// Names the assignment target when it is a plain column name. Targets
/// that can carry literals (`arr[1]`, expressions) are not echoed.
fn describe_assignment(children: &[Token]) -> String {
    match children.iter().find(|c| !c.is_trivia()) {
        Some(target) if is_plain_name(target) => format!("assignment to `{}`", target.render()),
        _ => "assignment".to_string(),
    }
}

fn is_plain_name(token: &Token) -> bool {
    match token {
        Token::Leaf { kind, .. } => matches!(kind, LeafKind::Name | LeafKind::QuotedName),
        Token::Group {
            kind: GroupKind::Identifier,
            children,
        } => children.iter().all(|c| {
            matches!(
                c.leaf_kind(),
                Some(LeafKind::Name | LeafKind::QuotedName | LeafKind::Keyword)
            ) || c.is_punctuation(".")
        }),
        Token::Group { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whitespace::strip_whitespace;

    fn stripped(sql: &str) -> Result<Token, CanonicalError> {
        let stmt = tree::parse(sql).expect("parse");
        strip_rhs_values(strip_whitespace(stmt, true))
    }

    #[test]
    fn comparison_loses_right_operand() {
        let tree = stripped("SELECT a FROM t WHERE x = 42").expect("strip");
        let rendered = tree.render();
        assert!(rendered.ends_with("WHERE x ="), "got {rendered}");
        assert!(!tree.leaves().any(|t| t.text() == Some("42")));
    }

    #[test]
    fn different_values_collapse() {
        let a = stripped("SELECT a FROM t WHERE x = 1 AND y LIKE 'a%'").expect("a");
        let b = stripped("SELECT a FROM t WHERE x = 999 AND y LIKE 'zz'").expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn nested_subquery_comparison_is_stripped() {
        let tree = stripped("SELECT a FROM t WHERE b IN (SELECT c FROM u WHERE d = 7)")
            .expect("strip");
        assert!(!tree.leaves().any(|t| t.text() == Some("7")));
    }

    #[test]
    fn assignment_is_rejected() {
        let err = stripped("UPDATE t SET x = 1").expect_err("assignment");
        assert_eq!(
            err,
            CanonicalError::UnsupportedConstruct {
                construct: "assignment to `x`".into()
            }
        );
    }

    #[test]
    fn assignment_error_does_not_leak_value() {
        let err = stripped("UPDATE t SET secret = 'hunter2'").expect_err("assignment");
        assert!(!err.to_string().contains("hunter2"));
    }

    #[test]
    fn whole_right_hand_expression_is_dropped() {
        let pairs = [
            ("SELECT a FROM t WHERE x = 1 + 1", "SELECT a FROM t WHERE x = 2 + 3"),
            ("SELECT a FROM t WHERE ts > now() - 5", "SELECT a FROM t WHERE ts > now() - 10"),
            ("SELECT a FROM t WHERE x = 'a' || 'b'", "SELECT a FROM t WHERE x = 'c' || 'd'"),
            ("SELECT a FROM t WHERE x = - 1", "SELECT a FROM t WHERE x = - 2"),
        ];
        for (left, right) in pairs {
            assert_eq!(
                stripped(left).expect("left"),
                stripped(right).expect("right"),
                "{left} vs {right}"
            );
        }
        let tree = stripped("SELECT a FROM t WHERE x = 1 + 1").expect("strip");
        assert!(!tree.leaves().any(|t| t.text() == Some("1") || t.text() == Some("+")));
    }

    #[test]
    fn assignment_target_with_literal_is_not_echoed() {
        let subscript = Token::group(
            GroupKind::Function,
            vec![
                Token::leaf(LeafKind::Name, "arr"),
                Token::group(
                    GroupKind::Parenthesis,
                    vec![
                        Token::leaf(LeafKind::Punctuation, "("),
                        Token::leaf(LeafKind::Number, "42"),
                        Token::leaf(LeafKind::Punctuation, ")"),
                    ],
                ),
            ],
        );
        let assignment = Token::group(
            GroupKind::Assignment,
            vec![
                subscript,
                Token::leaf(LeafKind::ComparisonOperator, "="),
                Token::leaf(LeafKind::Number, "7"),
            ],
        );
        let err = strip_rhs_values(Token::group(GroupKind::Statement, vec![assignment]))
            .expect_err("assignment");
        assert_eq!(
            err,
            CanonicalError::UnsupportedConstruct {
                construct: "assignment".into()
            }
        );
    }

    #[test]
    fn stripping_is_idempotent() {
        let once = stripped("SELECT a FROM t WHERE x >= 3").expect("once");
        let twice = strip_rhs_values(once.clone()).expect("twice");
        assert_eq!(once, twice);
    }

    #[test]
    fn works_without_whitespace_removal() {
        let stmt = tree::parse("SELECT a FROM t WHERE x = 3").expect("parse");
        let tree = strip_rhs_values(stmt).expect("strip");
        assert!(!tree.leaves().any(|t| t.text() == Some("3")));
    }
}
