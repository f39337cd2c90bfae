use tree::Token;

use crate::config::CanonicalizeConfig;
use crate::document::CanonicalizedQuery;
use crate::error::CanonicalError;
use crate::hash::hash_canonical_bytes;
use crate::order::order_alphabetically;
use crate::serialize::serialize;
use crate::values::strip_rhs_values;
use crate::whitespace::strip_whitespace;

/// Main entry point. Rewrites a statement tree into its canonical form.
///
/// Passes run in a fixed order: whitespace removal, right-hand value
/// stripping, alphabetical reordering. Sorting has to come last because
/// stripping changes the children, and so the sort keys, of comparisons.
pub fn canonicalize(tree: Token, cfg: &CanonicalizeConfig) -> Result<Token, CanonicalError> {
    validate_config(cfg)?;

    let tree = strip_whitespace(tree, cfg.strip_comments);
    let tree = strip_rhs_values(tree)?;
    Ok(order_alphabetically(tree))
}

/// Canonicalizes `tree`, serializes it and digests the result.
pub fn fingerprint_tree(
    tree: Token,
    cfg: &CanonicalizeConfig,
) -> Result<CanonicalizedQuery, CanonicalError> {
    let canonical_tree = canonicalize(tree, cfg)?;
    let canonical_text = serialize(&canonical_tree);
    let fingerprint = hash_canonical_bytes(cfg.version, canonical_text.as_bytes(), cfg.digest);

    Ok(CanonicalizedQuery {
        canonical_tree,
        canonical_text,
        fingerprint,
        canonical_version: cfg.version,
        config: cfg.clone(),
    })
}

fn validate_config(cfg: &CanonicalizeConfig) -> Result<(), CanonicalError> {
    // Version 0 is reserved.
    if cfg.version == 0 {
        return Err(CanonicalError::InvalidConfig(
            "config version must be >= 1".into(),
        ));
    }
    Ok(())
}
