//! Multisig redeem script construction.

use serde::{Deserialize, Serialize};

use addrkit_primitives::ec::public_key::{COMPRESSED_LEN, UNCOMPRESSED_LEN};

use crate::chunk::encode_push_datas;
use crate::opcodes::{small_int_op, OP_CHECKMULTISIG};
use crate::ScriptError;

/// Most keys a standard multisig script can list (OP_16).
pub const MAX_MULTISIG_KEYS: usize = 16;

/// Options for [`build_multisig`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MultisigOptions {
    /// Keep the caller's key order instead of sorting.
    pub no_sorting: bool,
}

impl MultisigOptions {
    /// Options that keep the caller's key order.
    pub fn unsorted() -> Self {
        MultisigOptions { no_sorting: true }
    }
}

/// Build the bytes of an `m`-of-`n` multisig redeem script.
///
/// Emits `OP_m <key>... OP_n OP_CHECKMULTISIG`. Unless `opts.no_sorting`
/// is set the keys are sorted by raw bytes first, so every party derives
/// the same script whatever order they list the keys in.
///
/// # Arguments
/// * `required` - Signatures needed to spend, `1..=pubkeys.len()`.
/// * `pubkeys` - Public keys, each 33 or 65 bytes. At most 16.
/// * `opts` - Sorting behaviour.
///
/// # Returns
/// The script bytes, `InvalidThreshold`, or `InvalidPubkeyLength` naming
/// the first bad key in caller order.
pub fn build_multisig<K: AsRef<[u8]>>(
    required: usize,
    pubkeys: &[K],
    opts: MultisigOptions,
) -> Result<Vec<u8>, ScriptError> {
    let total = pubkeys.len();
    if required == 0 || required > total || total > MAX_MULTISIG_KEYS {
        return Err(ScriptError::InvalidThreshold { required, total });
    }
    let mut keys: Vec<&[u8]> = pubkeys.iter().map(AsRef::as_ref).collect();
    if let Some((index, key)) = keys
        .iter()
        .enumerate()
        .find(|(_, k)| k.len() != COMPRESSED_LEN && k.len() != UNCOMPRESSED_LEN)
    {
        return Err(ScriptError::InvalidPubkeyLength { index, len: key.len() });
    }

    if !opts.no_sorting {
        keys.sort_unstable();
    }

    let threshold_op = small_int_op(required as u8)
        .ok_or(ScriptError::InvalidThreshold { required, total })?;
    let count_op = small_int_op(total as u8)
        .ok_or(ScriptError::InvalidThreshold { required, total })?;

    let mut script = Vec::with_capacity(3 + keys.iter().map(|k| 1 + k.len()).sum::<usize>());
    script.push(threshold_op);
    script.extend_from_slice(&encode_push_datas(&keys)?);
    script.push(count_op);
    script.push(OP_CHECKMULTISIG);
    Ok(script)
}
