//! Leaf hashing and fixture derivation for a sale pass Merkle allowlist.
//!
//! A leaf is `keccak256(abi.encodePacked(uint256 passId, address signer))`.
//! Tree assembly and proofs are left to the caller.

pub mod common;
pub mod error;
pub mod fixtures;
pub mod leaf;

pub use common::{hex_encode, keccak256_packed, parse_address, parse_pass_id, write_file_atomic};
pub use error::{Result, SalePassError};
pub use fixtures::{create_leaves, private_key_to_address};
pub use leaf::{calculate_hash, hash_leaves, LeafHash, PassLeaf};
