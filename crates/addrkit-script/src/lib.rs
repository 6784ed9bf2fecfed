/// Address derivation and output script recognition.
///
/// Provides the Script type, opcode definitions, script chunk parsing,
/// template classification, multisig construction, the network registry,
/// and the Base58Check `Address` with its cached validity state.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod classify;
pub mod multisig;
pub mod network;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::{Address, AddressState, Destinations, InvalidReason, PubKeySource, ResolvedAddress};
pub use chunk::ScriptChunk;
pub use classify::ScriptClass;
pub use multisig::MultisigOptions;
pub use network::{AddressRole, NetworkProfile, NetworkRegistry, PubkeyDigestKind};
