//! Hash function primitives.
//!
//! Provides SHA-256, double SHA-256, RIPEMD-160 and Hash160. Double SHA-256
//! drives the Base58Check checksum; Hash160 is the script-hash digest and
//! the default public-key digest.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Length of a Hash160 / RIPEMD-160 digest in bytes.
pub const HASH160_LEN: usize = 20;

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// Computes SHA-256(SHA-256(data)).
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte double-SHA-256 digest.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 20-byte RIPEMD-160 digest.
pub fn ripemd160(data: &[u8]) -> [u8; HASH160_LEN] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 20-byte Hash160 digest.
pub fn hash160(data: &[u8]) -> [u8; HASH160_LEN] {
    ripemd160(&sha256(data))
}

/// Compute the first 20 bytes of SHA-256d(data).
///
/// A multi-round alternative to [`hash160`] for networks that derive
/// public-key hashes from double SHA-256.
pub fn sha256d_160(data: &[u8]) -> [u8; HASH160_LEN] {
    let full = sha256d(data);
    let mut out = [0u8; HASH160_LEN];
    out.copy_from_slice(&full[..HASH160_LEN]);
    out
}
