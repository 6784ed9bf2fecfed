//! Raw scripts: redeem scripts to hash into P2SH addresses and output
//! scripts to pull destinations out of.

use std::fmt;

use crate::chunk::{decode_script, push_data_prefix, ScriptChunk};
use crate::classify::{classify, ScriptClass};
use crate::multisig::{build_multisig, MultisigOptions};
use crate::opcodes::*;
use crate::ScriptError;

/// Script bytes. No validation happens on construction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// An empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Decode a hex script such as `"a914...87"`.
    ///
    /// # Returns
    /// The script, or `InvalidHex`.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str)?;
        Ok(Script(bytes))
    }

    /// Copy raw bytes into a script.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Assemble a script from ASM text.
    ///
    /// Each whitespace-separated token is an opcode name (`OP_CHECKSIG`,
    /// `OP_2`) or a hex push.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        for section in asm.split_whitespace() {
            match string_to_opcode(section) {
                Some(opcode) => script.append_opcodes(&[opcode])?,
                None => script.append_push_data_hex(section)?,
            }
        }
        Ok(script)
    }

    /// Build an `m`-of-`n` multisig redeem script.
    ///
    /// Keys are sorted byte-lexicographically unless `opts.no_sorting` is
    /// set. See [`build_multisig`].
    pub fn multisig<K: AsRef<[u8]>>(
        required: usize,
        pubkeys: &[K],
        opts: MultisigOptions,
    ) -> Result<Self, ScriptError> {
        build_multisig(required, pubkeys, opts).map(Script)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// ASM text: pushes as hex, everything else by opcode name.
    ///
    /// A script that fails to parse renders as the empty string.
    pub fn to_asm(&self) -> String {
        match self.chunks() {
            Ok(chunks) => chunks
                .iter()
                .map(ScriptChunk::to_asm_string)
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => String::new(),
        }
    }

    /// The script bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// Match this script against the known output templates.
    pub fn classify(&self) -> ScriptClass {
        classify(&self.0)
    }

    /// Whether the whole script is the P2PKH output template.
    pub fn is_p2pkh(&self) -> bool {
        matches!(self.classify(), ScriptClass::PayToPubkeyHash(_))
    }

    /// Whether the whole script is the P2SH output template.
    pub fn is_p2sh(&self) -> bool {
        matches!(self.classify(), ScriptClass::PayToScriptHash(_))
    }

    /// Whether the script is a standard bare multisig output.
    pub fn is_multisig_out(&self) -> bool {
        matches!(self.classify(), ScriptClass::BareMultisig { .. })
    }

    /// Split into opcodes and pushes; `DataTooSmall` if a push runs past the end.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Push `data` using the shortest push encoding.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Push hex-encoded data; bad hex is `InvalidOpcodeData`.
    pub fn append_push_data_hex(&mut self, hex_str: &str) -> Result<(), ScriptError> {
        let data = hex::decode(hex_str).map_err(|_| ScriptError::InvalidOpcodeData)?;
        self.append_push_data(&data)
    }

    /// Append bare opcodes.
    ///
    /// Push opcodes need their payload, so they are refused with
    /// `InvalidOpcodeType` and nothing is appended.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptError> {
        if let Some(&op) = opcodes
            .iter()
            .find(|op| (OP_DATA_1..=OP_PUSHDATA4).contains(*op))
        {
            return Err(ScriptError::InvalidOpcodeType(opcode_to_string(op)));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Script::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}
