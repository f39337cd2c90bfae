//! Configuration types for the canonicalization pipeline.
//!
//! This module defines [`CanonicalizeConfig`], which controls how a token
//! tree is canonicalized and which digest turns it into a fingerprint.
//!
//! # Versioning
//!
//! The `version` field is part of every normalized fingerprint. Any change
//! to canonicalization behavior (even bug fixes) must come with a version
//! bump, so fingerprints produced under different rules never collide:
//!
//! - Old fingerprints remain stable and reproducible
//! - New fingerprints use updated behavior
//! - Fingerprints from different versions are distinct
//!
//! # Examples
//!
//! ```rust
//! use canonical::{CanonicalizeConfig, DigestAlgorithm};
//!
//! let config = CanonicalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.strip_comments);
//! assert_eq!(config.digest, DigestAlgorithm::Sha256);
//!
//! // Fingerprints compatible in width with 128-bit tooling.
//! let md5 = CanonicalizeConfig {
//!     digest: DigestAlgorithm::Md5,
//!     ..Default::default()
//! };
//! assert_eq!(md5.digest.output_len(), 16);
//! ```

use serde::{Deserialize, Serialize};

use crate::hash::DigestAlgorithm;

/// Configuration for the canonicalization pipeline.
///
/// # Serialization
///
/// ```json
/// {
///   "version": 1,
///   "strip_comments": true,
///   "digest": "sha256"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalizeConfig {
    /// Version of the canonicalization rules.
    ///
    /// Must be >= 1; version 0 is reserved and rejected with
    /// [`CanonicalError::InvalidConfig`](crate::CanonicalError::InvalidConfig).
    /// Included in the normalized digest:
    ///
    /// ```text
    /// digest(version.to_be_bytes() || 0x00 || canonical_text)
    /// ```
    pub version: u32,

    /// If true, the whitespace pass also drops comments.
    ///
    /// With comments kept, `SELECT 1 -- a` and `SELECT 1 -- b` produce
    /// different fingerprints.
    pub strip_comments: bool,

    /// Digest used for both normalized and exact fingerprints.
    pub digest: DigestAlgorithm,
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            strip_comments: true,
            digest: DigestAlgorithm::Sha256,
        }
    }
}
