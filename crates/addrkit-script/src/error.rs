/// Error types for script and address operations.
///
/// Covers script parsing, multisig construction, network lookup, address
/// construction and destination extraction.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Invalid opcode data encountered during ASM parsing.
    #[error("invalid opcode data")]
    InvalidOpcodeData,

    /// Attempted to use append_opcodes for a push data opcode.
    #[error("use append_push_data for push data funcs: {0}")]
    InvalidOpcodeType(String),

    /// Not enough data in script to complete a push operation.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds maximum allowed size.
    #[error("data too big")]
    DataTooBig,

    /// A push data part exceeds protocol limits.
    #[error("part too big '{0}'")]
    PartTooBig(usize),

    /// Multisig threshold outside `1..=len(pubkeys)`, or more than 16 keys.
    #[error("invalid multisig threshold: {required} of {total}")]
    InvalidThreshold { required: usize, total: usize },

    /// A multisig public key is neither 33 nor 65 bytes.
    #[error("invalid public key length {len} at index {index}")]
    InvalidPubkeyLength { index: usize, len: usize },

    /// An explicit address hash is not 20 bytes.
    #[error("invalid hash length: expected 20, got {0}")]
    InvalidHashLength(usize),

    /// No registry entry has this name.
    #[error("unknown network '{0}'")]
    UnknownNetwork(String),

    /// No registry entry uses this version byte.
    #[error("unknown address version {0:#04x}")]
    UnknownVersion(u8),

    /// A network was requested from an address that does not resolve to one.
    #[error("no network matches address '{0}'")]
    NoNetworkMatch(String),

    /// The output script matches no known template.
    #[error("unrecognized output script")]
    UnrecognizedScript,

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] addrkit_primitives::PrimitivesError),
}

impl From<hex::FromHexError> for ScriptError {
    fn from(e: hex::FromHexError) -> Self {
        ScriptError::InvalidHex(e.to_string())
    }
}
