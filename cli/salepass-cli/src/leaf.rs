//! Sale pass leaves and their Keccak-256 leaf hashes.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::common::{hex_encode, keccak256_packed, parse_address, parse_pass_id};
use crate::error::Result;

/// A `(passId, signer)` pair, one bottom-level entry of the allowlist tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassLeaf {
    /// Decimal string of a `uint256`
    pub pass_id: String,
    /// Signer address, EIP-55 checksummed when derived from a key
    pub signer: String,
}

impl PassLeaf {
    pub fn new<P: Into<String>, S: Into<String>>(pass_id: P, signer: S) -> Self {
        Self {
            pass_id: pass_id.into(),
            signer: signer.into(),
        }
    }

    /// Hashes this leaf, see [`calculate_hash`].
    pub fn hash(&self) -> Result<LeafHash> {
        calculate_hash(&self.pass_id, &self.signer)
    }
}

/// A 32-byte Keccak-256 leaf digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LeafHash(pub [u8; 32]);

impl LeafHash {
    /// Parse from a hex string, with or without the "0x" prefix
    pub fn from_hex(hex: &str) -> std::result::Result<Self, hex::FromHexError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for LeafHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_encode(self.0))
    }
}

impl AsRef<[u8]> for LeafHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for LeafHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for LeafHash {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LeafHash {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Computes the leaf hash `keccak256(abi.encodePacked(uint256 passId, address signer))`.
///
/// # Arguments
/// * `pass_id` - Decimal string of a non-negative integer below 2^256
/// * `signer` - 20-byte address as hex, checksummed or single-case
///
/// # Errors
/// Returns `InvalidInput` naming the offending field and value
pub fn calculate_hash(pass_id: &str, signer: &str) -> Result<LeafHash> {
    let pass_id = parse_pass_id(pass_id)?;
    let signer = parse_address(signer)?;
    Ok(LeafHash(keccak256_packed(pass_id, &signer)))
}

/// Hashes every leaf, keeping input order.
///
/// Fails as a whole with the error of the first invalid leaf.
pub fn hash_leaves(leaves: &[PassLeaf]) -> Result<Vec<LeafHash>> {
    let hashes = hash_each(leaves)?;
    debug!(count = hashes.len(), "hashed sale pass leaves");
    Ok(hashes)
}

#[cfg(not(feature = "parallel"))]
fn hash_each(leaves: &[PassLeaf]) -> Result<Vec<LeafHash>> {
    leaves.iter().map(PassLeaf::hash).collect()
}

#[cfg(feature = "parallel")]
fn hash_each(leaves: &[PassLeaf]) -> Result<Vec<LeafHash>> {
    use rayon::prelude::*;

    // Reported error must be the lowest failing index.
    let results: Vec<Result<LeafHash>> = leaves.par_iter().map(PassLeaf::hash).collect();
    results.into_iter().collect()
}
