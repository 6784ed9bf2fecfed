//! Base58 encoding and decoding with checksum support.
//!
//! Provides raw Base58 encode/decode, generic Base58Check (payload of any
//! length with a double-SHA-256 checksum), and the fixed-shape address
//! codec: `version(1) ++ hash(20) ++ checksum(4)`.

use crate::hash::{sha256d, HASH160_LEN};
use crate::Base58CheckError;

/// Bitcoin's modified Base58 alphabet.
///
/// Excludes 0, O, I, l to reduce visual ambiguity.
const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Number of checksum bytes appended by Base58Check.
pub const CHECKSUM_LEN: usize = 4;

/// Decoded length of an address payload: version + hash + checksum.
pub const ADDRESS_PAYLOAD_LEN: usize = 1 + HASH160_LEN + CHECKSUM_LEN;

/// Encode a byte slice to a Base58 string.
///
/// Leading zero bytes are encoded as leading '1' characters.
///
/// # Arguments
/// * `data` - The bytes to encode.
///
/// # Returns
/// A Base58-encoded string.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58 string to a byte vector.
///
/// Leading '1' characters decode to leading zero bytes.
///
/// # Arguments
/// * `s` - The Base58 string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or `InvalidCharacter` naming the first
/// character outside the alphabet.
pub fn decode(s: &str) -> Result<Vec<u8>, Base58CheckError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| invalid_character(s, e))
}

/// Encode a byte slice with a 4-byte double-SHA-256 checksum appended (Base58Check).
///
/// The result is `encode(data || sha256d(data)[..4])`.
pub fn check_encode(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut payload = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    payload.extend_from_slice(data);
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    encode(&payload)
}

/// Decode a Base58Check string of any payload length, verifying the checksum.
///
/// # Returns
/// The payload without its checksum, or an error for invalid characters,
/// input too short to carry a checksum, or a checksum mismatch.
pub fn check_decode(s: &str) -> Result<Vec<u8>, Base58CheckError> {
    let decoded = decode(s)?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(Base58CheckError::BadLength {
            expected: CHECKSUM_LEN,
            got: decoded.len(),
        });
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    verify_checksum(payload, checksum)?;
    Ok(payload.to_vec())
}

/// Encode a version byte and 20-byte hash as a Base58Check address string.
///
/// # Arguments
/// * `version` - The network/role version byte.
/// * `hash` - The 20-byte public-key or script hash.
///
/// # Returns
/// The Base58Check string of `version ++ hash ++ checksum`.
pub fn encode_address(version: u8, hash: &[u8; HASH160_LEN]) -> String {
    let mut data = [0u8; 1 + HASH160_LEN];
    data[0] = version;
    data[1..].copy_from_slice(hash);
    check_encode(&data)
}

/// Decode a Base58Check address string into its version byte and hash.
///
/// Checks run in a fixed order so each failure is reported precisely:
/// alphabet first, then the 25-byte payload length, then the checksum.
///
/// # Arguments
/// * `s` - The address string.
///
/// # Returns
/// `(version, hash)` on success; the checksum is discarded.
pub fn decode_address(s: &str) -> Result<(u8, [u8; HASH160_LEN]), Base58CheckError> {
    let decoded = decode(s)?;
    if decoded.len() != ADDRESS_PAYLOAD_LEN {
        return Err(Base58CheckError::BadLength {
            expected: ADDRESS_PAYLOAD_LEN,
            got: decoded.len(),
        });
    }
    let (payload, checksum) = decoded.split_at(1 + HASH160_LEN);
    verify_checksum(payload, checksum)?;

    let mut hash = [0u8; HASH160_LEN];
    hash.copy_from_slice(&payload[1..]);
    Ok((payload[0], hash))
}

fn verify_checksum(payload: &[u8], checksum: &[u8]) -> Result<(), Base58CheckError> {
    let expected = sha256d(payload);
    if checksum != &expected[..CHECKSUM_LEN] {
        return Err(Base58CheckError::BadChecksum);
    }
    Ok(())
}

/// Map a bs58 decode failure onto the offending character.
fn invalid_character(s: &str, err: bs58::decode::Error) -> Base58CheckError {
    if let bs58::decode::Error::InvalidCharacter { character, index } = err {
        return Base58CheckError::InvalidCharacter { character, index };
    }
    let (index, character) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii() || !ALPHABET.contains(&(*c as u8)))
        .unwrap_or((0, char::REPLACEMENT_CHARACTER));
    Base58CheckError::InvalidCharacter { character, index }
}
