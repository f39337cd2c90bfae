//! Builds a grouped statement tree out of flat leaves.
//!
//! Grouping runs bottom-up: parenthesised token lists are grouped as soon as
//! their closing parenthesis is seen, so every list is fully grouped before
//! it becomes a child of its parent. Within one list the passes run in a
//! fixed order: identifiers, functions, operations, aliases, comparisons,
//! identifier lists, `WHERE` clauses. Operations are grouped before
//! comparisons so a whole expression like `1 + 1` ends up as one operand.

use crate::error::ParseError;
use crate::token::{GroupKind, LeafKind, Token};

/// Keywords that carry clause structure and can never be an operand.
const RESERVED: &[&str] = &[
    "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CREATE", "CROSS",
    "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXCEPT", "EXISTS", "FETCH", "FROM",
    "FULL", "GROUP", "HAVING", "ILIKE", "IN", "INNER", "INSERT", "INTERSECT", "INTO", "IS",
    "JOIN", "LEFT", "LIKE", "LIMIT", "NATURAL", "NOT", "OFFSET", "ON", "OR", "ORDER", "OUTER",
    "REPLACE", "RETURNING", "RIGHT", "SELECT", "SET", "SOME", "TABLE", "THEN", "UNION",
    "UPDATE", "USING", "VALUES", "WHEN", "WHERE", "WINDOW", "WITH",
];

/// Keywords that close a `WHERE` clause.
const WHERE_TERMINATORS: &[&str] = &[
    "EXCEPT",
    "FETCH",
    "GROUP",
    "HAVING",
    "INTERSECT",
    "LIMIT",
    "OFFSET",
    "ORDER",
    "RETURNING",
    "UNION",
    "WINDOW",
];

/// Binary operators chained into an `Operation` group.
const EXPRESSION_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "//", "%", "||", "&", "|", "^", "#", "<<", ">>", "->", "->>",
];

/// Keywords that close a `SET` clause.
const SET_TERMINATORS: &[&str] = &["FROM", "LIMIT", "ORDER", "RETURNING", "WHERE"];

/// Splits flat leaves at top-level `;` and returns the statements that
/// contain at least one meaningful token. Each `;` stays with the statement
/// it terminates.
pub(crate) fn split_statements(leaves: Vec<Token>) -> Vec<Vec<Token>> {
    let mut statements = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;

    for token in leaves {
        let terminates = depth == 0 && token.is_punctuation(";");
        if token.is_punctuation("(") {
            depth += 1;
        } else if token.is_punctuation(")") {
            depth = depth.saturating_sub(1);
        }
        current.push(token);
        if terminates {
            statements.push(std::mem::take(&mut current));
        }
    }
    statements.push(current);

    statements.retain(|stmt| {
        stmt.iter()
            .any(|t| !t.is_trivia() && !t.is_punctuation(";"))
    });
    statements
}

/// Groups one statement's leaves into a `Statement` tree.
pub(crate) fn build_statement(
    leaves: Vec<Token>,
    max_nesting_depth: usize,
) -> Result<Token, ParseError> {
    let children = nest_parentheses(leaves, max_nesting_depth)?;
    Ok(Token::group(GroupKind::Statement, children))
}

fn nest_parentheses(leaves: Vec<Token>, max_depth: usize) -> Result<Vec<Token>, ParseError> {
    // One frame per open parenthesis; frame 0 is the statement itself.
    let mut frames: Vec<Vec<Token>> = vec![Vec::new()];
    let mut open_positions: Vec<usize> = Vec::new();

    for (position, token) in leaves.into_iter().enumerate() {
        if token.is_punctuation("(") {
            if open_positions.len() >= max_depth {
                return Err(ParseError::NestingTooDeep { limit: max_depth });
            }
            open_positions.push(position);
            frames.push(vec![token]);
        } else if token.is_punctuation(")") {
            if open_positions.pop().is_none() {
                return Err(ParseError::UnbalancedParenthesis { position });
            }
            let mut inner = frames
                .pop()
                .ok_or(ParseError::UnbalancedParenthesis { position })?;
            inner.push(token);
            let group = Token::group(GroupKind::Parenthesis, group_tokens(inner));
            frames
                .last_mut()
                .ok_or(ParseError::UnbalancedParenthesis { position })?
                .push(group);
        } else if let Some(frame) = frames.last_mut() {
            frame.push(token);
        }
    }

    if let Some(&position) = open_positions.first() {
        return Err(ParseError::UnbalancedParenthesis { position });
    }
    let root = frames.pop().unwrap_or_default();
    Ok(group_tokens(root))
}

/// Applies every grouping pass to one token list.
fn group_tokens(tokens: Vec<Token>) -> Vec<Token> {
    let tokens = group_identifiers(tokens);
    let tokens = group_functions(tokens);
    let tokens = group_operations(tokens);
    let tokens = group_aliases(tokens);
    let tokens = group_comparisons(tokens);
    let tokens = group_identifier_lists(tokens);
    group_where(tokens)
}

fn group_identifiers(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut i = 0;
    while i < tokens.len() {
        if is_name_like(&tokens[i]) {
            let mut end = i;
            while end + 2 < tokens.len()
                && tokens[end + 1].is_punctuation(".")
                && (is_name_like(&tokens[end + 2]) || is_star(&tokens[end + 2]))
            {
                end += 2;
                if is_star(&tokens[end]) {
                    break;
                }
            }
            if end > i {
                wrap(&mut tokens, i, end, GroupKind::Identifier);
            }
        }
        i += 1;
    }
    tokens
}

fn group_functions(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut i = 0;
    while i + 1 < tokens.len() {
        let callee = is_name_like(&tokens[i])
            || tokens[i].group_kind() == Some(GroupKind::Identifier);
        if callee && tokens[i + 1].group_kind() == Some(GroupKind::Parenthesis) {
            wrap(&mut tokens, i, i + 1, GroupKind::Function);
        }
        i += 1;
    }
    tokens
}

/// Groups arithmetic and concatenation expressions.
///
/// Unary signs are folded first: a sign touching a number becomes part of
/// the number literal, any other sign and its operand form an `Operation`.
/// Then every `operand (op operand)*` chain becomes one `Operation`.
fn group_operations(tokens: Vec<Token>) -> Vec<Token> {
    let mut tokens = group_unary_signs(tokens);
    let mut i = 0;
    while i < tokens.len() {
        let Some(start) = binary_operator_at(&tokens, i)
            .then(|| prev_significant(&tokens, i))
            .flatten()
        else {
            i += 1;
            continue;
        };

        let mut end = start;
        let mut op = i;
        while binary_operator_at(&tokens, op) {
            match next_significant(&tokens, op + 1).filter(|&n| is_operand(&tokens[n])) {
                Some(operand) => end = operand,
                None => break,
            }
            match next_significant(&tokens, end + 1) {
                Some(next) => op = next,
                None => break,
            }
        }

        if end > i {
            wrap(&mut tokens, start, end, GroupKind::Operation);
            i = start + 1;
        } else {
            i += 1;
        }
    }
    tokens
}

fn group_unary_signs(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut i = 0;
    while i < tokens.len() {
        let is_sign = tokens[i].leaf_kind() == Some(LeafKind::Operator)
            && matches!(tokens[i].text(), Some("-") | Some("+"));
        let unary = is_sign
            && !prev_significant(&tokens, i).is_some_and(|p| is_operand(&tokens[p]));
        let operand = next_significant(&tokens, i + 1)
            .filter(|&n| unary && is_operand(&tokens[n]));

        match operand {
            Some(n) if n == i + 1 && tokens[n].leaf_kind() == Some(LeafKind::Number) => {
                let text: String = tokens
                    .drain(i..=n)
                    .filter_map(|t| t.text().map(str::to_string))
                    .collect();
                tokens.insert(i, Token::leaf(LeafKind::Number, text));
            }
            Some(n) => wrap(&mut tokens, i, n, GroupKind::Operation),
            None => {}
        }
        i += 1;
    }
    tokens
}

/// True when `tokens[idx]` is a binary operator with an operand on its left.
fn binary_operator_at(tokens: &[Token], idx: usize) -> bool {
    let token = &tokens[idx];
    token.leaf_kind() == Some(LeafKind::Operator)
        && token
            .text()
            .is_some_and(|op| EXPRESSION_OPERATORS.contains(&op))
        && prev_significant(tokens, idx).is_some_and(|p| is_operand(&tokens[p]))
}

/// `expr AS name` becomes one `Identifier` group.
fn group_aliases(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_keyword("AS") {
            let target = prev_significant(&tokens, i).filter(|&p| is_operand(&tokens[p]));
            let alias = next_significant(&tokens, i + 1).filter(|&n| is_name_like(&tokens[n]));
            if let (Some(start), Some(end)) = (target, alias) {
                wrap(&mut tokens, start, end, GroupKind::Identifier);
                i = start + 1;
                continue;
            }
        }
        i += 1;
    }
    tokens
}

fn group_comparisons(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut in_set_clause = false;
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_keyword("SET") || is_upsert_update(&tokens, i) {
            in_set_clause = true;
        } else if SET_TERMINATORS.iter().any(|kw| tokens[i].is_keyword(kw)) {
            in_set_clause = false;
        }

        if tokens[i].leaf_kind() != Some(LeafKind::ComparisonOperator) {
            i += 1;
            continue;
        }

        let op = tokens[i].text().unwrap_or_default().to_string();
        let mut left = prev_significant(&tokens, i);
        if let Some(l) = left {
            if tokens[l].is_keyword("NOT") && is_word_operator(&op) {
                left = prev_significant(&tokens, l);
            }
        }
        let right = next_significant(&tokens, i + 1);

        match (left, right) {
            (Some(l), Some(r)) if is_operand(&tokens[l]) && is_operand(&tokens[r]) => {
                let kind = if op == ":=" || (in_set_clause && op == "=") {
                    GroupKind::Assignment
                } else {
                    GroupKind::Comparison
                };
                wrap(&mut tokens, l, r, kind);
                i = l + 1;
            }
            _ => i += 1,
        }
    }
    tokens
}

fn group_identifier_lists(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut i = 0;
    while i < tokens.len() {
        if !tokens[i].is_punctuation(",") {
            i += 1;
            continue;
        }
        let Some(start) = prev_significant(&tokens, i).filter(|&s| is_list_item(&tokens[s]))
        else {
            i += 1;
            continue;
        };

        let mut comma = i;
        let mut last_item = None;
        while let Some(item) =
            next_significant(&tokens, comma + 1).filter(|&n| is_list_item(&tokens[n]))
        {
            last_item = Some(item);
            match next_significant(&tokens, item + 1) {
                Some(next) if tokens[next].is_punctuation(",") => comma = next,
                _ => break,
            }
        }

        match last_item {
            Some(end) => {
                wrap(&mut tokens, start, end, GroupKind::IdentifierList);
                i = start + 1;
            }
            None => i += 1,
        }
    }
    tokens
}

fn group_where(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_keyword("WHERE") {
            let end = (i + 1..tokens.len())
                .find(|&j| {
                    let t = &tokens[j];
                    t.is_punctuation(";")
                        || t.is_punctuation(")")
                        || WHERE_TERMINATORS.iter().any(|kw| t.is_keyword(kw))
                })
                .unwrap_or(tokens.len());
            wrap(&mut tokens, i, end - 1, GroupKind::Where);
        }
        i += 1;
    }
    tokens
}

/// Replaces `tokens[start..=end]` with one group holding them.
fn wrap(tokens: &mut Vec<Token>, start: usize, end: usize, kind: GroupKind) {
    let children: Vec<Token> = tokens.drain(start..=end).collect();
    tokens.insert(start, Token::group(kind, children));
}

/// `UPDATE` directly after `DUPLICATE KEY` starts an assignment list.
fn is_upsert_update(tokens: &[Token], idx: usize) -> bool {
    tokens[idx].is_keyword("UPDATE")
        && prev_significant(tokens, idx).is_some_and(|p| tokens[p].is_keyword("KEY"))
}

fn prev_significant(tokens: &[Token], before: usize) -> Option<usize> {
    (0..before).rev().find(|&j| !tokens[j].is_trivia())
}

fn next_significant(tokens: &[Token], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&j| !tokens[j].is_trivia())
}

fn is_word_operator(op: &str) -> bool {
    op.eq_ignore_ascii_case("LIKE") || op.eq_ignore_ascii_case("ILIKE")
}

fn is_reserved(text: &str) -> bool {
    RESERVED.iter().any(|kw| text.eq_ignore_ascii_case(kw))
}

fn is_star(token: &Token) -> bool {
    token.leaf_kind() == Some(LeafKind::Operator) && token.text() == Some("*")
}

fn is_name_like(token: &Token) -> bool {
    match token {
        Token::Leaf {
            kind: LeafKind::Name | LeafKind::QuotedName,
            ..
        } => true,
        Token::Leaf {
            kind: LeafKind::Keyword,
            text,
        } => !is_reserved(text),
        _ => false,
    }
}

fn is_operand(token: &Token) -> bool {
    if is_name_like(token) {
        return true;
    }
    match token {
        Token::Leaf { kind, .. } => matches!(
            kind,
            LeafKind::Number | LeafKind::String | LeafKind::Placeholder
        ),
        Token::Group { kind, .. } => matches!(
            kind,
            GroupKind::Identifier
                | GroupKind::Function
                | GroupKind::Operation
                | GroupKind::Parenthesis
        ),
    }
}

fn is_list_item(token: &Token) -> bool {
    is_operand(token)
        || is_star(token)
        || matches!(
            token.group_kind(),
            Some(GroupKind::Comparison | GroupKind::Assignment)
        )
}
