/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, key parsing, and Base58 / Base58Check encoding.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error(transparent)]
    Base58Check(#[from] Base58CheckError),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}

/// Reasons a Base58Check string fails to decode.
///
/// The three checks are independent: an input that survives the alphabet
/// check can still fail on payload length, and a correctly sized payload
/// can still fail its checksum. Values are cheap to clone so callers can
/// cache them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Base58CheckError {
    /// A character outside the Base58 alphabet (including whitespace).
    #[error("invalid base58 character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },

    /// The decoded payload does not have the expected number of bytes.
    #[error("bad payload length: expected {expected} bytes, got {got}")]
    BadLength { expected: usize, got: usize },

    /// The trailing 4 bytes do not match the double-SHA-256 of the payload.
    #[error("checksum mismatch")]
    BadChecksum,
}
