//! Workspace umbrella crate for SQL query fingerprinting.
//!
//! This crate stitches parsing and canonicalization together so callers can
//! go from SQL text to a fingerprint with a single call.
//!
//! Two fingerprints exist for every statement:
//!
//! - **normalized**: parse, canonicalize, serialize, digest. Invariant to
//!   whitespace, comments, clause order and compared literal values.
//!   Fails on unparseable SQL and on `UPDATE ... SET` assignments.
//! - **exact**: digest of the raw bytes. Never fails; any byte difference
//!   changes it.
//!
//! ```rust
//! use sqlfp::{generate_normalized_query_hash, generate_query_hash};
//!
//! let a = generate_normalized_query_hash("SELECT a FROM t WHERE x = 1").unwrap();
//! let b = generate_normalized_query_hash("SELECT a FROM t WHERE x = 999").unwrap();
//! assert_eq!(a, b);
//!
//! assert_ne!(generate_query_hash("SELECT a"), generate_query_hash("SELECT  a"));
//! ```

pub mod config;

pub use canonical::{
    canonicalize, fingerprint_tree, hash_canonical_bytes, hash_text, order_alphabetically,
    serialize, strip_rhs_values, strip_whitespace, CanonicalError, CanonicalizeConfig,
    CanonicalizedQuery, DigestAlgorithm, Fingerprint,
};
pub use tree::{
    parse, GroupKind, LeafKind, ParseError, ParserConfig, SqlDialect, SqlTokenParser,
    StatementParser, Token,
};

pub use crate::config::{ConfigLoadError, SqlfpConfig};

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn, Level};

/// Errors that can occur while computing a normalized fingerprint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("parse failure: {0}")]
    Parse(#[from] ParseError),
    #[error("canonicalization failure: {0}")]
    Canonical(#[from] CanonicalError),
}

impl FingerprintError {
    /// True when the statement parsed but holds a construct the
    /// normalized path refuses to fingerprint.
    pub fn is_unsupported_construct(&self) -> bool {
        matches!(
            self,
            FingerprintError::Canonical(CanonicalError::UnsupportedConstruct { .. })
        )
    }
}

/// Parser and canonicalizer settings used together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub canonical: CanonicalizeConfig,
}

/// Both fingerprints of one statement plus the canonical text behind the
/// normalized one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFingerprint {
    pub canonical_text: String,
    pub normalized: Fingerprint,
    pub exact: Fingerprint,
    pub canonical_version: u32,
}

/// Fingerprint generator bound to one parser and one canonical config.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct QueryFingerprinter<P = SqlTokenParser> {
    parser: P,
    canonical: CanonicalizeConfig,
}

impl QueryFingerprinter<SqlTokenParser> {
    /// Builds a fingerprinter with the bundled parser.
    pub fn new(config: FingerprintConfig) -> Result<Self, FingerprintError> {
        let parser = SqlTokenParser::new(config.parser)?;
        Ok(Self {
            parser,
            canonical: config.canonical,
        })
    }
}

impl Default for QueryFingerprinter<SqlTokenParser> {
    fn default() -> Self {
        Self {
            parser: SqlTokenParser::default(),
            canonical: CanonicalizeConfig::default(),
        }
    }
}

impl<P: StatementParser> QueryFingerprinter<P> {
    /// Builds a fingerprinter around any [`StatementParser`].
    pub fn with_parser(parser: P, canonical: CanonicalizeConfig) -> Self {
        Self { parser, canonical }
    }

    pub fn canonical_config(&self) -> &CanonicalizeConfig {
        &self.canonical
    }

    /// Parses and canonicalizes `sql`, returning the full canonical form.
    pub fn canonicalize(&self, sql: &str) -> Result<CanonicalizedQuery, FingerprintError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "sqlfp.normalized_fingerprint",
            query_len = sql.len(),
            digest = %self.canonical.digest
        );
        let _guard = span.enter();

        let result = self
            .parser
            .parse(sql)
            .map_err(FingerprintError::from)
            .and_then(|stmt| fingerprint_tree(stmt, &self.canonical).map_err(Into::into));

        let elapsed_micros = start.elapsed().as_micros();
        match &result {
            Ok(query) => debug!(
                fingerprint = %query.fingerprint,
                canonical_len = query.canonical_text.len(),
                elapsed_micros,
                "normalized_fingerprint_success"
            ),
            Err(err) => warn!(error = %err, elapsed_micros, "normalized_fingerprint_failure"),
        }
        result
    }

    pub fn normalized_fingerprint(&self, sql: &str) -> Result<Fingerprint, FingerprintError> {
        self.canonicalize(sql).map(|query| query.fingerprint)
    }

    /// Digest of the raw query bytes. Never fails, and accepts input that
    /// is not valid UTF-8.
    pub fn exact_fingerprint(&self, sql: impl AsRef<[u8]>) -> Fingerprint {
        hash_text(sql, self.canonical.digest)
    }

    /// Both fingerprints; fails exactly when the normalized path fails.
    pub fn fingerprint(&self, sql: &str) -> Result<QueryFingerprint, FingerprintError> {
        let query = self.canonicalize(sql)?;
        Ok(QueryFingerprint {
            canonical_text: query.canonical_text,
            normalized: query.fingerprint,
            exact: self.exact_fingerprint(sql),
            canonical_version: query.canonical_version,
        })
    }

    /// Normalized fingerprint when the statement supports it, otherwise the
    /// exact fingerprint.
    ///
    /// The two kinds never compare equal to each other, so callers mixing
    /// them in one keyspace should keep the returned flag.
    pub fn fingerprint_or_exact(&self, sql: &str) -> (Fingerprint, bool) {
        match self.normalized_fingerprint(sql) {
            Ok(fp) => (fp, true),
            Err(err) => {
                warn!(error = %err, "falling back to exact fingerprint");
                (self.exact_fingerprint(sql), false)
            }
        }
    }

    /// Fingerprints every statement, in input order.
    pub fn fingerprint_batch<S>(&self, queries: &[S]) -> Vec<Result<QueryFingerprint, FingerprintError>>
    where
        S: AsRef<str> + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            queries
                .par_iter()
                .map(|sql| self.fingerprint(sql.as_ref()))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            queries
                .iter()
                .map(|sql| self.fingerprint(sql.as_ref()))
                .collect()
        }
    }
}

/// Normalized fingerprint with default parser and canonical settings.
pub fn normalized_fingerprint(sql: &str) -> Result<Fingerprint, FingerprintError> {
    QueryFingerprinter::default().normalized_fingerprint(sql)
}

/// Exact fingerprint with the default digest, over any bytes.
pub fn exact_fingerprint(sql: impl AsRef<[u8]>) -> Fingerprint {
    hash_text(sql, DigestAlgorithm::default())
}

/// Hex form of [`normalized_fingerprint`].
pub fn generate_normalized_query_hash(sql: &str) -> Result<String, FingerprintError> {
    normalized_fingerprint(sql).map(|fp| fp.to_hex())
}

/// Hex form of [`exact_fingerprint`].
pub fn generate_query_hash(sql: impl AsRef<[u8]>) -> String {
    exact_fingerprint(sql).to_hex()
}
