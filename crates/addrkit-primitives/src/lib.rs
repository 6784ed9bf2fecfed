/// Address toolkit - Cryptographic primitives and encodings.
///
/// This crate provides the foundational building blocks for address handling:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Base58 and Base58Check encoding/decoding
/// - secp256k1 key wrappers (parsing and SEC1 serialization)

pub mod hash;
pub mod base58;
pub mod ec;

mod error;
pub use error::{Base58CheckError, PrimitivesError};
