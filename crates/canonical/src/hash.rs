//! Digest utilities for query fingerprints.
//!
//! This module provides the digest step of the pipeline:
//! - Normalized fingerprints (version-aware, over canonical text)
//! - Exact fingerprints (version-agnostic, over raw query bytes)
//!
//! # Hash Algorithms
//!
//! ## Normalized Fingerprint
//!
//! ```text
//! digest(version.to_be_bytes() || 0x00 || canonical_text_bytes)
//! ```
//!
//! ## Exact Fingerprint
//!
//! ```text
//! digest(raw_bytes)
//! ```
//!
//! # Digest Choice
//!
//! [`DigestAlgorithm`] is a knob, not a security boundary: MD5 and FxHash
//! are fine for deduplication and cache keys, SHA-256 when collision
//! resistance against adversarial input matters.
//!
//! # Examples
//!
//! ```rust
//! use canonical::{hash_canonical_bytes, hash_text, DigestAlgorithm};
//!
//! let exact = hash_text("SELECT 1", DigestAlgorithm::Sha256);
//! assert_eq!(exact.to_hex().len(), 64);
//!
//! let v1 = hash_canonical_bytes(1, b"SELECT 1", DigestAlgorithm::Md5);
//! let v2 = hash_canonical_bytes(2, b"SELECT 1", DigestAlgorithm::Md5);
//! assert_ne!(v1, v2);
//! assert_eq!(v1.to_hex().len(), 32);
//! ```

use std::fmt;
use std::hash::Hasher;

use fxhash::FxHasher64;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest primitive used to turn bytes into a fixed-width fingerprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// 128-bit MD5.
    Md5,
    /// 256-bit SHA-256.
    #[default]
    Sha256,
    /// 64-bit FxHash; fast, non-cryptographic.
    Fx64,
}

impl DigestAlgorithm {
    /// Width of the digest in bytes.
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Fx64 => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Fx64 => "fx64",
        }
    }

    /// Parse an algorithm name as written in config files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "md5" => Some(DigestAlgorithm::Md5),
            "sha256" | "sha-256" => Some(DigestAlgorithm::Sha256),
            "fx64" | "fxhash" => Some(DigestAlgorithm::Fx64),
            _ => None,
        }
    }

    /// Digest the concatenation of `parts`.
    fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Md5 => {
                let mut ctx = md5::Context::new();
                for part in parts {
                    ctx.consume(*part);
                }
                ctx.compute().0.to_vec()
            }
            DigestAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                for part in parts {
                    hasher.update(*part);
                }
                hasher.finalize().to_vec()
            }
            DigestAlgorithm::Fx64 => {
                let mut hasher = FxHasher64::default();
                for part in parts {
                    hasher.write(part);
                }
                hasher.finish().to_be_bytes().to_vec()
            }
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed-width digest identifying a query's canonical or raw form.
///
/// `Display` renders lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    algorithm: DigestAlgorithm,
    #[serde(with = "hex_bytes")]
    bytes: Vec<u8>,
}

impl Fingerprint {
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}

/// Digest raw query bytes with no normalization.
///
/// This is the exact-match fingerprint: total, and sensitive to every
/// byte of the input. Input need not be valid UTF-8. It does **not**
/// include version information.
pub fn hash_text(text: impl AsRef<[u8]>, algorithm: DigestAlgorithm) -> Fingerprint {
    Fingerprint {
        algorithm,
        bytes: algorithm.digest(&[text.as_ref()]),
    }
}

/// Compute the normalized fingerprint of canonical text under a version.
///
/// # Algorithm
///
/// ```text
/// digest(version.to_be_bytes() || 0x00 || canonical_bytes)
/// ```
///
/// - `version.to_be_bytes()`: 4-byte big-endian version number
/// - `0x00`: discriminator separating the version from the text
pub fn hash_canonical_bytes(
    canonical_version: u32,
    canonical_bytes: &[u8],
    algorithm: DigestAlgorithm,
) -> Fingerprint {
    let version = canonical_version.to_be_bytes();
    let parts: [&[u8]; 3] = [&version, &[0u8], canonical_bytes];
    Fingerprint {
        algorithm,
        bytes: algorithm.digest(&parts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_matches_known_vector() {
        let fp = hash_text("", DigestAlgorithm::Md5);
        assert_eq!(fp.to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn sha256_matches_known_vector() {
        let fp = hash_text("abc", DigestAlgorithm::Sha256);
        assert_eq!(
            fp.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn widths_are_fixed_per_algorithm() {
        for algo in [
            DigestAlgorithm::Md5,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Fx64,
        ] {
            for text in ["", "SELECT 1", "SELECT a FROM t WHERE x = 'é'"] {
                let fp = hash_text(text, algo);
                assert_eq!(fp.as_bytes().len(), algo.output_len());
                assert_eq!(fp.algorithm(), algo);
            }
        }
    }

    #[test]
    fn raw_bytes_need_not_be_utf8() {
        let raw: &[u8] = b"SELECT '\xff\xfe'";
        let fp = hash_text(raw, DigestAlgorithm::Md5);
        assert_eq!(fp.as_bytes().len(), 16);
        let lossy = String::from_utf8_lossy(raw).into_owned();
        assert_ne!(fp, hash_text(lossy, DigestAlgorithm::Md5));
        assert_eq!(
            hash_text("SELECT 1", DigestAlgorithm::Sha256),
            hash_text(b"SELECT 1", DigestAlgorithm::Sha256)
        );
    }

    #[test]
    fn canonical_hash_includes_version() {
        let a = hash_canonical_bytes(1, b"select", DigestAlgorithm::Fx64);
        let b = hash_canonical_bytes(2, b"select", DigestAlgorithm::Fx64);
        assert_ne!(a, b);
        assert_eq!(a, hash_canonical_bytes(1, b"select", DigestAlgorithm::Fx64));
    }

    #[test]
    fn canonical_hash_differs_from_plain_digest() {
        let plain = hash_text("select", DigestAlgorithm::Sha256);
        let versioned = hash_canonical_bytes(1, b"select", DigestAlgorithm::Sha256);
        assert_ne!(plain, versioned);
    }

    #[test]
    fn fingerprint_serializes_as_hex() {
        let fp = hash_text("abc", DigestAlgorithm::Md5);
        let json = serde_json::to_value(&fp).expect("serialize");
        assert_eq!(json["algorithm"], "md5");
        assert_eq!(json["bytes"], fp.to_hex());
        let back: Fingerprint = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, fp);
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!(DigestAlgorithm::from_name("SHA256"), Some(DigestAlgorithm::Sha256));
        assert_eq!(DigestAlgorithm::from_name("fxhash"), Some(DigestAlgorithm::Fx64));
        assert_eq!(DigestAlgorithm::from_name("crc32"), None);
    }
}
