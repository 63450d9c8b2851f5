use alloy_primitives::Address;
use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Result, SalePassError};
use crate::leaf::PassLeaf;

/// Parses a secp256k1 private key from a hex string.
///
/// The decoded bytes are wiped once the signing key is built. Error reasons
/// never include key material.
///
/// # Arguments
/// * `key_str` - 32 bytes as hex, with or without "0x" prefix
fn parse_private_key(key_str: &str) -> std::result::Result<SigningKey, String> {
    let cleaned = key_str.strip_prefix("0x").unwrap_or(key_str);
    if cleaned.is_empty() {
        return Err("private key is empty".to_string());
    }
    if cleaned.len() != 64 {
        return Err(format!("expected 64 hex chars, got {}", cleaned.len()));
    }
    let mut key_bytes = Zeroizing::new([0u8; 32]);
    hex::decode_to_slice(cleaned, &mut key_bytes[..])
        .map_err(|_| "invalid hex encoding".to_string())?;
    SigningKey::from_slice(&key_bytes[..])
        .map_err(|_| "not a valid secp256k1 scalar".to_string())
}

/// Derives the Ethereum address of a signing key.
///
/// The address is the last 20 bytes of the Keccak-256 hash of the
/// uncompressed public point without its 0x04 tag.
pub fn private_key_to_address(signing_key: &SigningKey) -> Address {
    let public_key = signing_key.verifying_key();
    let encoded = public_key.to_encoded_point(false);
    let pub_bytes = encoded.as_bytes();
    let hash = Keccak256::digest(&pub_bytes[1..]);
    Address::from_slice(&hash[12..32])
}

fn derive_leaf(index: usize, key: &str) -> Result<PassLeaf> {
    let signing_key =
        parse_private_key(key).map_err(|reason| SalePassError::invalid_key(index, reason))?;
    let signer = private_key_to_address(&signing_key).to_checksum(None);
    Ok(PassLeaf::new(index.to_string(), signer))
}

/// Builds fixture leaves from private keys.
///
/// Key `i` becomes `{ passId: "i", signer: <checksummed address> }`, so pass
/// ids run `"0", "1", ...` without gaps in input order.
///
/// # Errors
/// Returns `InvalidKey` with the index of the first malformed key
pub fn create_leaves<S: AsRef<str> + Sync>(private_keys: &[S]) -> Result<Vec<PassLeaf>> {
    let leaves = derive_each(private_keys)?;
    debug!(count = leaves.len(), "derived fixture leaves");
    Ok(leaves)
}

#[cfg(not(feature = "parallel"))]
fn derive_each<S: AsRef<str> + Sync>(private_keys: &[S]) -> Result<Vec<PassLeaf>> {
    private_keys
        .iter()
        .enumerate()
        .map(|(i, key)| derive_leaf(i, key.as_ref()))
        .collect()
}

#[cfg(feature = "parallel")]
fn derive_each<S: AsRef<str> + Sync>(private_keys: &[S]) -> Result<Vec<PassLeaf>> {
    use rayon::prelude::*;

    let results: Vec<Result<PassLeaf>> = private_keys
        .par_iter()
        .enumerate()
        .map(|(i, key)| derive_leaf(i, key.as_ref()))
        .collect();
    results.into_iter().collect()
}
