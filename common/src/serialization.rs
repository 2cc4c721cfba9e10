use anyhow::{anyhow, Result};
use num_bigint::BigUint;

/// Converts a BigUint to a big-endian hexadecimal string.
pub fn biguint_to_hex(n: &BigUint) -> String {
    hex::encode(n.to_bytes_be())
}

/// Converts a hexadecimal string to a BigUint.
pub fn hex_to_biguint(hex: &str) -> Result<BigUint> {
    let decoded = hex::decode(hex).map_err(|e| anyhow!("Failed to decode hex string: {}", e))?;
    Ok(BigUint::from_bytes_be(&decoded))
}
