use alloy_primitives::{Address, U256};
use anyhow::Context;
use sha3::{Digest, Keccak256};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, SalePassError};

/// Parses a sale pass id from its decimal string form.
///
/// # Arguments
/// * `pass_id` - Decimal digits only, no sign and no surrounding whitespace
///
/// # Returns
/// The pass id as an unsigned 256-bit integer
///
/// # Errors
/// Returns `InvalidInput` if the string is empty, contains anything other
/// than ASCII digits, or does not fit in 256 bits
pub fn parse_pass_id(pass_id: &str) -> Result<U256> {
    if pass_id.is_empty() {
        return Err(SalePassError::invalid_input("passId", pass_id, "empty value"));
    }
    if let Some(c) = pass_id.chars().find(|c| !c.is_ascii_digit()) {
        return Err(SalePassError::invalid_input(
            "passId",
            pass_id,
            format!("expected a non-negative decimal integer, found '{c}'"),
        ));
    }
    U256::from_str_radix(pass_id, 10)
        .map_err(|_| SalePassError::invalid_input("passId", pass_id, "does not fit in 256 bits"))
}

/// Parses an Ethereum address from a hex string.
///
/// All-lowercase and all-uppercase hex are taken as-is. Mixed case is
/// treated as an EIP-55 checksum and must match exactly.
///
/// # Arguments
/// * `addr_str` - The address string, with or without "0x" prefix
///
/// # Errors
/// Returns `InvalidInput` if the address is not 40 hex characters, contains
/// invalid hex, or carries a bad checksum
pub fn parse_address(addr_str: &str) -> Result<Address> {
    let cleaned = addr_str.strip_prefix("0x").unwrap_or(addr_str);
    if cleaned.len() != 40 {
        return Err(SalePassError::invalid_input(
            "signer",
            addr_str,
            format!("expected 40 hex chars, got {}", cleaned.len()),
        ));
    }
    let mut bytes = [0u8; 20];
    hex::decode_to_slice(cleaned, &mut bytes).map_err(|e| {
        SalePassError::invalid_input("signer", addr_str, format!("invalid hex encoding: {e}"))
    })?;
    let address = Address::from(bytes);

    let has_lower = cleaned.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = cleaned.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = address.to_checksum(None);
        if &checksummed[2..] != cleaned {
            return Err(SalePassError::invalid_input(
                "signer",
                addr_str,
                "bad address checksum",
            ));
        }
    }

    Ok(address)
}

/// Computes `keccak256(abi.encodePacked(uint256, address))`.
///
/// The pass id takes 32 big-endian bytes and the address its raw 20 bytes,
/// with no padding between them.
pub fn keccak256_packed(pass_id: U256, signer: &Address) -> [u8; 32] {
    let hash = Keccak256::new()
        .chain_update(pass_id.to_be_bytes::<32>())
        .chain_update(signer.as_slice())
        .finalize();
    hash.into()
}

/// Hex encodes bytes with a "0x" prefix.
pub fn hex_encode<T: AsRef<[u8]>>(bytes: T) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Writes `contents` to `path` through a sibling temp file and a rename,
/// so readers never observe a partially written file.
pub fn write_file_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path).context("Failed to create temp file")?;
    file.write_all(contents.as_bytes())
        .context("Failed to write to temp file")?;
    file.flush().context("Failed to flush temp file")?;
    file.sync_all().context("Failed to sync temp file")?;
    std::fs::rename(&temp_path, path).context("Failed to move temp file to output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITALIK: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";

    #[test]
    fn test_parse_pass_id() {
        assert_eq!(parse_pass_id("0").unwrap(), U256::ZERO);
        assert_eq!(parse_pass_id("42").unwrap(), U256::from(42u64));
        assert_eq!(parse_pass_id("007").unwrap(), U256::from(7u64));
    }

    #[test]
    fn test_parse_pass_id_max() {
        let max = U256::MAX.to_string();
        assert_eq!(parse_pass_id(&max).unwrap(), U256::MAX);
    }

    #[test]
    fn test_parse_pass_id_overflow() {
        // 2^256
        let too_big =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(parse_pass_id(too_big).is_err());
    }

    #[test]
    fn test_parse_pass_id_rejects_non_decimal() {
        for bad in ["", "-1", "+1", "1.5", "0x10", " 1", "abc"] {
            let err = parse_pass_id(bad).unwrap_err();
            assert!(
                matches!(err, SalePassError::InvalidInput { field: "passId", .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_address_checksummed() {
        let address = parse_address(VITALIK).unwrap();
        assert_eq!(address.to_checksum(None), VITALIK);
    }

    #[test]
    fn test_parse_address_lowercase_and_uppercase() {
        let lower = parse_address(&VITALIK.to_lowercase()).unwrap();
        let upper = parse_address(&format!("0x{}", VITALIK[2..].to_uppercase())).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_parse_address_without_prefix() {
        let addr = "1234567890abcdef1234567890abcdef12345678";
        assert!(parse_address(addr).is_ok());
    }

    #[test]
    fn test_parse_address_zero_allowed() {
        let addr = "0x0000000000000000000000000000000000000000";
        assert_eq!(parse_address(addr).unwrap(), Address::ZERO);
    }

    #[test]
    fn test_parse_address_bad_checksum() {
        let flipped = VITALIK.replace("Ab58", "aB58");
        let err = parse_address(&flipped).unwrap_err();
        assert!(err.to_string().contains("bad address checksum"));
    }

    #[test]
    fn test_parse_address_invalid_length() {
        // one hex digit short
        let addr = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9";
        let result = parse_address(addr);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_address_invalid_hex() {
        let addr = "0xghijklmnopqrstuvwxyz1234567890abcdef1234";
        let result = parse_address(addr);
        assert!(result.is_err());
    }

    #[test]
    fn test_keccak256_packed_is_52_byte_preimage() {
        let signer = parse_address(VITALIK).unwrap();
        let mut preimage = [0u8; 52];
        preimage[31] = 1;
        preimage[32..].copy_from_slice(signer.as_slice());
        let expected: [u8; 32] = Keccak256::digest(preimage).into();
        assert_eq!(keccak256_packed(U256::from(1u64), &signer), expected);
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode([0xabu8, 0x01]), "0xab01");
    }

    #[test]
    fn test_write_file_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_file_atomic(&path, "[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(!path.with_extension("tmp").exists());
    }
}
