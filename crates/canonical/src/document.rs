//! Output type of the canonicalization pipeline.
//!
//! # Determinism
//!
//! For a fixed [`CanonicalizeConfig`] and input tree, every field of
//! [`CanonicalizedQuery`] is deterministic:
//! - Same `canonical_tree`
//! - Same `canonical_text`
//! - Same `fingerprint`

use serde::{Deserialize, Serialize};
use tree::Token;

use crate::config::CanonicalizeConfig;
use crate::hash::Fingerprint;

/// The canonical form of one statement and its normalized fingerprint.
///
/// ```text
/// CanonicalizedQuery
/// ├── canonical_tree: Token             # Tree after the three passes
/// ├── canonical_text: String            # Serialized canonical tree
/// ├── fingerprint: Fingerprint          # Digest of version + text
/// ├── canonical_version: u32            # Config version used
/// └── config: CanonicalizeConfig        # Config snapshot
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalizedQuery {
    pub canonical_tree: Token,
    /// Digest input; see [`serialize`](crate::serialize).
    pub canonical_text: String,
    pub fingerprint: Fingerprint,
    pub canonical_version: u32,
    pub config: CanonicalizeConfig,
}
