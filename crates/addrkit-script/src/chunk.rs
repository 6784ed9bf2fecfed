//! Splitting scripts into opcodes and pushes, and emitting push prefixes.
//!
//! Decoding is strict: a push whose length runs past the end of the script
//! is an error rather than a short chunk, so template matching never sees
//! a half-read key.

use crate::opcodes::*;
use crate::ScriptError;

/// One opcode, with its payload when the opcode is a push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// Opcode byte; for direct pushes it doubles as the payload length.
    pub op: u8,
    /// Pushed bytes, `None` for non-push opcodes.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Convert this chunk to its ASM string representation.
    ///
    /// Data push chunks are rendered as hex strings; non-push opcodes use
    /// their canonical OP_xxx name.
    pub fn to_asm_string(&self) -> String {
        match self.data {
            Some(ref data) => hex::encode(data),
            None => opcode_to_string(self.op),
        }
    }

    /// The pushed bytes if this chunk is a direct push (OP_DATA_1..OP_DATA_75).
    ///
    /// Extended pushes (OP_PUSHDATA1/2/4) return `None`: standard output
    /// templates only ever use direct pushes.
    pub fn direct_push(&self) -> Option<&[u8]> {
        match self.data {
            Some(ref data) if (OP_DATA_1..=OP_DATA_75).contains(&self.op) => Some(data),
            _ => None,
        }
    }
}

/// Decode raw script bytes into a vector of `ScriptChunk` values.
///
/// Handles OP_DATA_1..OP_DATA_75 (direct push) and OP_PUSHDATA1/2/4
/// (extended push). Every other byte is a bare opcode.
///
/// # Arguments
/// * `bytes` - The raw script bytes to decode.
///
/// # Returns
/// A vector of parsed chunks, or `DataTooSmall` if a push runs past the
/// end of the script.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];

        let (header, length) = match op {
            OP_DATA_1..=OP_DATA_75 => (1, op as usize),
            OP_PUSHDATA1 => {
                let b = read_slice(bytes, pos + 1, 1)?;
                (2, b[0] as usize)
            }
            OP_PUSHDATA2 => {
                let b = read_slice(bytes, pos + 1, 2)?;
                (3, u16::from_le_bytes([b[0], b[1]]) as usize)
            }
            OP_PUSHDATA4 => {
                let b = read_slice(bytes, pos + 1, 4)?;
                (5, u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize)
            }
            _ => {
                chunks.push(ScriptChunk { op, data: None });
                pos += 1;
                continue;
            }
        };

        let data = read_slice(bytes, pos + header, length)?.to_vec();
        chunks.push(ScriptChunk { op, data: Some(data) });
        pos += header + length;
    }

    Ok(chunks)
}

fn read_slice(bytes: &[u8], start: usize, len: usize) -> Result<&[u8], ScriptError> {
    start
        .checked_add(len)
        .and_then(|end| bytes.get(start..end))
        .ok_or(ScriptError::DataTooSmall)
}

/// Compute the OP_PUSHDATA prefix bytes for a data payload of the given length.
///
/// # Arguments
/// * `data_len` - The length of the data to be pushed.
///
/// # Returns
/// The minimal prefix for the push, or `DataTooBig` past 4 GiB.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFF_FFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

/// Encode multiple data payloads into a single byte vector with push prefixes.
///
/// # Arguments
/// * `parts` - Slice of data byte slices to encode.
///
/// # Returns
/// All pushes concatenated, or `PartTooBig(i)` naming the oversized part.
pub fn encode_push_datas(parts: &[&[u8]]) -> Result<Vec<u8>, ScriptError> {
    let mut result = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let prefix = push_data_prefix(part.len()).map_err(|_| ScriptError::PartTooBig(i))?;
        result.extend_from_slice(&prefix);
        result.extend_from_slice(part);
    }
    Ok(result)
}
