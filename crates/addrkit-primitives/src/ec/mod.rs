/// Elliptic curve keys on secp256k1.
///
/// Provides private and public key wrappers; only parsing and SEC1
/// serialization are needed for address derivation.

pub mod private_key;
pub mod public_key;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
