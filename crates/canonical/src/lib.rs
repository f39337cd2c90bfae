//! Canonical form of SQL statements.
//!
//! This crate rewrites a parsed statement into a value-independent,
//! order-independent tree and derives a fixed-width fingerprint from it.
//! Two statements that differ only in whitespace, clause order or the
//! literals compared against columns end up with the same fingerprint.
//!
//! ## What we do
//!
//! - Whitespace removal (comments too, by default)
//! - Right-hand value stripping on every comparison, at any depth
//! - Alphabetical reordering of every group's children
//! - Structural serialization of the result
//! - Versioned digests so you can tell which rules produced a fingerprint
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no shared state. Trees are consumed and rebuilt,
//! never mutated in place, so concurrent calls need no coordination.
//!
//! ## Invariants worth knowing
//!
//! - `UPDATE ... SET col = value` is rejected, never normalized
//! - The canonical tree is a hashing key, not executable SQL
//! - Fingerprint = digest(version || 0x00 || serialize(canonical_tree))
//!
//! Bottom line: same statement shape + same config = same fingerprint.

mod config;
mod document;
mod error;
mod hash;
mod order;
mod pipeline;
mod serialize;
mod values;
mod whitespace;

pub use crate::config::CanonicalizeConfig;
pub use crate::document::CanonicalizedQuery;
pub use crate::error::CanonicalError;
pub use crate::hash::{hash_canonical_bytes, hash_text, DigestAlgorithm, Fingerprint};
pub use crate::order::order_alphabetically;
pub use crate::pipeline::{canonicalize, fingerprint_tree};
pub use crate::serialize::serialize;
pub use crate::values::strip_rhs_values;
pub use crate::whitespace::strip_whitespace;
