//! Output script template recognition.
//!
//! Three templates are recognized, each matched exactly against the whole
//! script:
//!
//! - P2PKH: `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
//! - P2SH: `OP_HASH160 <20 bytes> OP_EQUAL`
//! - bare multisig: `OP_m <pubkey>... OP_n OP_CHECKMULTISIG`, `1 <= m <= n <= 16`,
//!   each key a direct push of 33 or 65 bytes
//!
//! Anything else is [`ScriptClass::Unrecognized`].

use log::trace;

use addrkit_primitives::ec::public_key::{COMPRESSED_LEN, UNCOMPRESSED_LEN};
use addrkit_primitives::hash::HASH160_LEN;

use crate::chunk::decode_script;
use crate::network::{AddressRole, PubkeyDigestKind};
use crate::opcodes::*;

/// Result of matching an output script against the known templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptClass {
    /// Pays to the hash of one public key.
    PayToPubkeyHash([u8; HASH160_LEN]),
    /// Pays to the hash of a redeem script.
    PayToScriptHash([u8; HASH160_LEN]),
    /// Lists the public keys directly, in script order.
    BareMultisig { required: u8, pubkeys: Vec<Vec<u8>> },
    /// Matches no template.
    Unrecognized,
}

impl ScriptClass {
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, ScriptClass::Unrecognized)
    }

    /// The role of the destination hashes this class yields.
    ///
    /// Bare multisig keys become pubkey-hash destinations.
    pub fn role(&self) -> Option<AddressRole> {
        match self {
            ScriptClass::PayToPubkeyHash(_) | ScriptClass::BareMultisig { .. } => {
                Some(AddressRole::PubKeyHash)
            }
            ScriptClass::PayToScriptHash(_) => Some(AddressRole::ScriptHash),
            ScriptClass::Unrecognized => None,
        }
    }

    /// The 20-byte destination hashes, in script order.
    ///
    /// Bare multisig keys are hashed with `digest`; the other templates
    /// already carry their hash. Unrecognized scripts yield nothing.
    pub fn destination_hashes(&self, digest: PubkeyDigestKind) -> Vec<[u8; HASH160_LEN]> {
        match self {
            ScriptClass::PayToPubkeyHash(hash) | ScriptClass::PayToScriptHash(hash) => {
                vec![*hash]
            }
            ScriptClass::BareMultisig { pubkeys, .. } => {
                pubkeys.iter().map(|k| digest.digest(k)).collect()
            }
            ScriptClass::Unrecognized => Vec::new(),
        }
    }
}

/// Classify raw output script bytes.
pub fn classify(bytes: &[u8]) -> ScriptClass {
    let class = match_p2pkh(bytes)
        .or_else(|| match_p2sh(bytes))
        .or_else(|| match_bare_multisig(bytes))
        .unwrap_or(ScriptClass::Unrecognized);
    trace!("classified script {} as {:?}", hex::encode(bytes), class);
    class
}

fn match_p2pkh(bytes: &[u8]) -> Option<ScriptClass> {
    match bytes {
        [OP_DUP, OP_HASH160, OP_DATA_20, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG] => {
            hash.try_into().ok().map(ScriptClass::PayToPubkeyHash)
        }
        _ => None,
    }
}

fn match_p2sh(bytes: &[u8]) -> Option<ScriptClass> {
    match bytes {
        [OP_HASH160, OP_DATA_20, hash @ .., OP_EQUAL] => {
            hash.try_into().ok().map(ScriptClass::PayToScriptHash)
        }
        _ => None,
    }
}

fn match_bare_multisig(bytes: &[u8]) -> Option<ScriptClass> {
    let chunks = decode_script(bytes).ok()?;
    let (first, rest) = chunks.split_first()?;
    let (last, rest) = rest.split_last()?;
    let (total, keys) = rest.split_last()?;

    if last.op != OP_CHECKMULTISIG {
        return None;
    }
    let required = small_int_value(first.op).filter(|m| *m >= 1)?;
    let n = small_int_value(total.op)?;
    if required > n || keys.len() != n as usize {
        return None;
    }

    let pubkeys = keys
        .iter()
        .map(|chunk| {
            chunk
                .direct_push()
                .filter(|k| k.len() == COMPRESSED_LEN || k.len() == UNCOMPRESSED_LEN)
                .map(<[u8]>::to_vec)
        })
        .collect::<Option<Vec<_>>>()?;

    Some(ScriptClass::BareMultisig { required, pubkeys })
}
