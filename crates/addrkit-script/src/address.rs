//! Base58Check addresses and their validity state.
//!
//! An `Address` keeps the exact text it was built from. Whether that text
//! is a valid address, and for which network and role, is worked out the
//! first time anyone asks and cached; the answer never changes afterwards.
//! Addresses derived from keys or scripts are built already decoded and
//! always render as their canonical encoding.

use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use log::debug;

use addrkit_primitives::base58::{decode_address, encode_address};
use addrkit_primitives::ec::{PrivateKey, PublicKey};
use addrkit_primitives::hash::HASH160_LEN;
use addrkit_primitives::{Base58CheckError, PrimitivesError};

use crate::classify::ScriptClass;
use crate::multisig::MultisigOptions;
use crate::network::{script_hash, AddressRole, NetworkProfile, NetworkRegistry};
use crate::script::Script;
use crate::ScriptError;

type Registry = NetworkRegistry<'static>;

// ---------------------------------------------------------------------------
// Key sources
// ---------------------------------------------------------------------------

/// Anything that can hand over serialized public key bytes.
///
/// The bytes are hashed as given, so a compressed and an uncompressed
/// encoding of the same point yield different addresses.
pub trait PubKeySource {
    /// The public key in its active (compressed or uncompressed) encoding.
    fn public_key_bytes(&self) -> Vec<u8>;
}

impl PubKeySource for PublicKey {
    fn public_key_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl PubKeySource for PrivateKey {
    fn public_key_bytes(&self) -> Vec<u8> {
        self.pub_key().to_bytes()
    }
}

// ---------------------------------------------------------------------------
// Validity state
// ---------------------------------------------------------------------------

/// Why an address failed to resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidReason {
    /// The text is not a well-formed Base58Check address payload.
    Decode(Base58CheckError),
    /// The payload decoded, but no registered network uses its version byte.
    UnknownVersion {
        version: u8,
        hash: [u8; HASH160_LEN],
    },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Decode(e) => write!(f, "{}", e),
            InvalidReason::UnknownVersion { version, .. } => {
                write!(f, "unknown address version {:#04x}", version)
            }
        }
    }
}

impl From<InvalidReason> for ScriptError {
    fn from(reason: InvalidReason) -> Self {
        match reason {
            InvalidReason::Decode(e) => ScriptError::Primitives(PrimitivesError::Base58Check(e)),
            InvalidReason::UnknownVersion { version, .. } => ScriptError::UnknownVersion(version),
        }
    }
}

/// A successfully resolved address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub version: u8,
    pub hash: [u8; HASH160_LEN],
    pub network: &'static NetworkProfile,
    pub role: AddressRole,
}

/// Where an address stands.
///
/// Starts `Unparsed` and moves exactly once to `Valid` or `Invalid`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressState {
    Unparsed,
    Valid(ResolvedAddress),
    Invalid(InvalidReason),
}

static UNPARSED: AddressState = AddressState::Unparsed;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A Base58Check address: a version byte and a 20-byte hash.
///
/// Equality and hashing follow the text the address was built from.
#[derive(Clone, Debug)]
pub struct Address {
    raw: String,
    decoded: Option<(u8, [u8; HASH160_LEN])>,
    registry: &'static Registry,
    state: OnceLock<AddressState>,
}

impl Address {
    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    /// Wrap address text without validating it.
    ///
    /// Never fails; use [`Address::is_valid`] or [`Address::state`] to find
    /// out what the text is.
    pub fn from_string(s: &str) -> Self {
        Self::from_string_in(s, NetworkRegistry::global())
    }

    /// Like [`Address::from_string`], resolving against `registry`.
    pub fn from_string_in(s: &str, registry: &'static Registry) -> Self {
        Address {
            raw: s.to_string(),
            decoded: None,
            registry,
            state: OnceLock::new(),
        }
    }

    /// Build an address from an explicit version byte and hash.
    ///
    /// The address renders as the encoding of `(version, hash)` even when
    /// the version belongs to no registered network; such an address
    /// resolves to `Invalid(UnknownVersion)`.
    ///
    /// # Arguments
    /// * `version` - The version byte.
    /// * `hash` - The 20-byte hash.
    ///
    /// # Returns
    /// The address, or `InvalidHashLength` if `hash` is not 20 bytes.
    pub fn from_version_hash(version: u8, hash: &[u8]) -> Result<Self, ScriptError> {
        Self::from_version_hash_in(version, hash, NetworkRegistry::global())
    }

    /// Like [`Address::from_version_hash`], resolving against `registry`.
    pub fn from_version_hash_in(
        version: u8,
        hash: &[u8],
        registry: &'static Registry,
    ) -> Result<Self, ScriptError> {
        let hash: [u8; HASH160_LEN] = hash
            .try_into()
            .map_err(|_| ScriptError::InvalidHashLength(hash.len()))?;
        Ok(Self::decoded(version, hash, registry))
    }

    fn decoded(version: u8, hash: [u8; HASH160_LEN], registry: &'static Registry) -> Self {
        Address {
            raw: encode_address(version, &hash),
            decoded: Some((version, hash)),
            registry,
            state: OnceLock::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Derivation
    // -----------------------------------------------------------------------

    /// Pay-to-pubkey-hash address of a serialized public key.
    ///
    /// The key is hashed with the network's pubkey digest exactly as given;
    /// its encoding is not checked.
    ///
    /// # Arguments
    /// * `pubkey` - Serialized public key bytes.
    /// * `network` - Registry name of the target network.
    ///
    /// # Returns
    /// The address, or `UnknownNetwork`.
    pub fn from_pub_key(pubkey: &[u8], network: &str) -> Result<Self, ScriptError> {
        Self::from_pub_key_in(pubkey, network, NetworkRegistry::global())
    }

    /// Like [`Address::from_pub_key`], using `registry`.
    pub fn from_pub_key_in(
        pubkey: &[u8],
        network: &str,
        registry: &'static Registry,
    ) -> Result<Self, ScriptError> {
        let profile = registry.lookup_by_name(network)?;
        Ok(Self::decoded(
            profile.pub_key_hash_version,
            profile.pubkey_hash(pubkey),
            registry,
        ))
    }

    /// Pay-to-pubkey-hash address of a key object.
    ///
    /// A private key is first reduced to its public key, keeping its
    /// compression flag.
    pub fn from_key<K: PubKeySource + ?Sized>(key: &K, network: &str) -> Result<Self, ScriptError> {
        Self::from_pub_key(&key.public_key_bytes(), network)
    }

    /// Like [`Address::from_key`], using `registry`.
    pub fn from_key_in<K: PubKeySource + ?Sized>(
        key: &K,
        network: &str,
        registry: &'static Registry,
    ) -> Result<Self, ScriptError> {
        Self::from_pub_key_in(&key.public_key_bytes(), network, registry)
    }

    /// P2SH address of an `m`-of-`n` multisig redeem script.
    ///
    /// # Arguments
    /// * `required` - Signatures needed to spend.
    /// * `pubkeys` - Public keys, 33 or 65 bytes each.
    /// * `network` - Registry name of the target network.
    /// * `opts` - Key ordering; sorted unless `no_sorting` is set.
    ///
    /// # Returns
    /// The address, `UnknownNetwork`, or a multisig construction error.
    pub fn from_pub_keys<K: AsRef<[u8]>>(
        required: usize,
        pubkeys: &[K],
        network: &str,
        opts: MultisigOptions,
    ) -> Result<Self, ScriptError> {
        Self::from_pub_keys_in(required, pubkeys, network, opts, NetworkRegistry::global())
    }

    /// Like [`Address::from_pub_keys`], using `registry`.
    pub fn from_pub_keys_in<K: AsRef<[u8]>>(
        required: usize,
        pubkeys: &[K],
        network: &str,
        opts: MultisigOptions,
        registry: &'static Registry,
    ) -> Result<Self, ScriptError> {
        let profile = registry.lookup_by_name(network)?;
        let script = Script::multisig(required, pubkeys, opts)?;
        Ok(Self::decoded(profile.p2sh_version, script_hash(script.to_bytes()), registry))
    }

    /// P2SH address of an arbitrary redeem script.
    ///
    /// The script hash is always Hash160, whatever the network's pubkey
    /// digest.
    pub fn from_script(script: &Script, network: &str) -> Result<Self, ScriptError> {
        Self::from_script_in(script, network, NetworkRegistry::global())
    }

    /// Like [`Address::from_script`], using `registry`.
    pub fn from_script_in(
        script: &Script,
        network: &str,
        registry: &'static Registry,
    ) -> Result<Self, ScriptError> {
        let profile = registry.lookup_by_name(network)?;
        Ok(Self::decoded(profile.p2sh_version, script_hash(script.to_bytes()), registry))
    }

    /// P2SH address of a hex-encoded redeem script.
    pub fn from_script_hex(script_hex: &str, network: &str) -> Result<Self, ScriptError> {
        Self::from_script(&Script::from_hex(script_hex)?, network)
    }

    /// Destination addresses of an output script.
    ///
    /// P2PKH and P2SH outputs yield one address. A bare multisig output
    /// yields one pubkey-hash address per listed key, in script order.
    ///
    /// # Arguments
    /// * `script` - The output script.
    /// * `network` - Registry name of the target network.
    ///
    /// # Returns
    /// The destinations, `UnknownNetwork`, or `UnrecognizedScript`.
    pub fn from_script_pub_key(script: &Script, network: &str) -> Result<Destinations, ScriptError> {
        Self::from_script_pub_key_in(script, network, NetworkRegistry::global())
    }

    /// Like [`Address::from_script_pub_key`], using `registry`.
    pub fn from_script_pub_key_in(
        script: &Script,
        network: &str,
        registry: &'static Registry,
    ) -> Result<Destinations, ScriptError> {
        let profile = registry.lookup_by_name(network)?;
        let class = script.classify();
        let version = match class.role() {
            Some(role) => profile.version_for(role),
            None => {
                debug!("no destination in output script {}", script.to_hex());
                return Err(ScriptError::UnrecognizedScript);
            }
        };

        let mut addresses: Vec<Address> = class
            .destination_hashes(profile.pubkey_digest)
            .into_iter()
            .map(|hash| Self::decoded(version, hash, registry))
            .collect();
        match class {
            ScriptClass::BareMultisig { .. } => Ok(Destinations::Multiple(addresses)),
            _ => addresses
                .pop()
                .map(Destinations::Single)
                .ok_or(ScriptError::UnrecognizedScript),
        }
    }

    /// Destination addresses of a hex-encoded output script.
    pub fn from_script_pub_key_hex(
        script_hex: &str,
        network: &str,
    ) -> Result<Destinations, ScriptError> {
        Self::from_script_pub_key(&Script::from_hex(script_hex)?, network)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The resolved state, resolving on first use.
    ///
    /// Concurrent first calls may race to resolve, but every caller sees
    /// the same stored result.
    pub fn state(&self) -> &AddressState {
        self.state.get_or_init(|| self.resolve())
    }

    /// The state as it stands now, without resolving.
    pub fn current_state(&self) -> &AddressState {
        self.state.get().unwrap_or(&UNPARSED)
    }

    /// Whether the address decodes and its version belongs to a known network.
    pub fn is_valid(&self) -> bool {
        matches!(self.state(), AddressState::Valid(_))
    }

    /// The network the address belongs to.
    ///
    /// # Returns
    /// The profile, or `NoNetworkMatch` if the address is invalid.
    pub fn network(&self) -> Result<&'static NetworkProfile, ScriptError> {
        match self.state() {
            AddressState::Valid(resolved) => Ok(resolved.network),
            _ => Err(ScriptError::NoNetworkMatch(self.raw.clone())),
        }
    }

    /// Whether the address is a valid pay-to-script-hash address.
    pub fn is_script(&self) -> bool {
        self.role() == Some(AddressRole::ScriptHash)
    }

    pub fn role(&self) -> Option<AddressRole> {
        match self.state() {
            AddressState::Valid(resolved) => Some(resolved.role),
            _ => None,
        }
    }

    /// The version byte, if the text decoded.
    pub fn version(&self) -> Option<u8> {
        match self.state() {
            AddressState::Valid(resolved) => Some(resolved.version),
            AddressState::Invalid(InvalidReason::UnknownVersion { version, .. }) => Some(*version),
            _ => None,
        }
    }

    /// The 20-byte hash, if the text decoded.
    pub fn hash(&self) -> Option<[u8; HASH160_LEN]> {
        match self.state() {
            AddressState::Valid(resolved) => Some(resolved.hash),
            AddressState::Invalid(InvalidReason::UnknownVersion { hash, .. }) => Some(*hash),
            _ => None,
        }
    }

    /// The resolved address, or the reason it is invalid as an error.
    ///
    /// # Returns
    /// The resolution, `UnknownVersion`, or the Base58Check decode error
    /// wrapped in `Primitives`.
    pub fn validate(&self) -> Result<ResolvedAddress, ScriptError> {
        match self.state() {
            AddressState::Valid(resolved) => Ok(*resolved),
            AddressState::Invalid(reason) => Err(reason.clone().into()),
            AddressState::Unparsed => Err(ScriptError::NoNetworkMatch(self.raw.clone())),
        }
    }

    pub fn invalid_reason(&self) -> Option<&InvalidReason> {
        match self.state() {
            AddressState::Invalid(reason) => Some(reason),
            _ => None,
        }
    }

    /// The text the address was built from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn resolve(&self) -> AddressState {
        let decoded = match self.decoded {
            Some(pair) => Ok(pair),
            None => decode_address(&self.raw),
        };
        let state = match decoded {
            Err(e) => AddressState::Invalid(InvalidReason::Decode(e)),
            Ok((version, hash)) => match self.registry.resolve_version(version) {
                Some((network, role)) => AddressState::Valid(ResolvedAddress {
                    version,
                    hash,
                    network,
                    role,
                }),
                None => AddressState::Invalid(InvalidReason::UnknownVersion { version, hash }),
            },
        };
        if let AddressState::Invalid(reason) = &state {
            debug!("address '{}' is invalid: {}", self.raw, reason);
        }
        state
    }
}

impl fmt::Display for Address {
    /// The canonical encoding when valid, otherwise the original text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            AddressState::Valid(resolved) => {
                f.write_str(&encode_address(resolved.version, &resolved.hash))
            }
            _ => f.write_str(&self.raw),
        }
    }
}

impl FromStr for Address {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Address::from_string(s))
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address::from_string(s)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Address::from_string(&s))
    }
}

// ---------------------------------------------------------------------------
// Destinations
// ---------------------------------------------------------------------------

/// Addresses paid by one output script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destinations {
    /// A P2PKH or P2SH output.
    Single(Address),
    /// A bare multisig output, one address per key in script order.
    Multiple(Vec<Address>),
}

impl Destinations {
    pub fn as_slice(&self) -> &[Address] {
        match self {
            Destinations::Single(address) => std::slice::from_ref(address),
            Destinations::Multiple(addresses) => addresses,
        }
    }

    pub fn into_vec(self) -> Vec<Address> {
        match self {
            Destinations::Single(address) => vec![address],
            Destinations::Multiple(addresses) => addresses,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{BITCOIN, DICECOIN, TESTNET};
    use addrkit_primitives::hash::hash160;

    const PUBKEY_UNCOMPRESSED: &str = "040CD920F6F59B5DE3D808A72CB4961DE8E9209DD6BE542A791AAB601A05C88E\
                                       BC7D1AE06B6C05671797FA911E418A4B9A8E9CA6019666F4C8A96817F1A51CB2E7";
    const PRIV_HEX: &str = "0cd920f6f59b5de3d808a72cb4961decb9140722b07a49c5db3444739525caf9";

    const KEY1: &str = "03e0973263b4e0d5f5f56d25d430e777ab3838ff644db972c0bf32c31da5686c27";
    const KEY2: &str = "0371f94c57cc013507101e30794161f4e6b9efd58a9ea68838daf429b7feac8cb2";
    const KEY3: &str = "032c0d2e394541e2efdc7ac3500e16e7e69df541f38670402e95aa477202fa06bb";

    /// Valid addresses and the network each belongs to.
    const VALID: &[(&str, &str)] = &[
        ("sbiBUHm5nmKAypAZUaicLvMBAqGHj3GA1a", "dicecoin"),
        ("sQCBqDw1hTNAwBLYL8naUBXduvxs6cu59h", "dicecoin"),
        ("DEjzu3Ape6SSD1Ge5Go8NGTFc6nSaH3HTB", "dicecoin"),
        ("32QBdjycLwbDTuGafUwaU5p5GxzSLPYoF6", "bitcoin"),
        ("1Q1pE5vPGEEMqRcVRMbtBK842Y6Pzo6nK9", "bitcoin"),
        ("1KfyjCgBSMsLqiCbakfSdeoBUqMqLUiu3T", "bitcoin"),
        ("1dice8EMZmqKvrGE4Qc9bUFf9PX3xaYDp", "bitcoin"),
        ("3QRhucKtEn5P9i7YPxzXCqBtPJTPbRFycn", "bitcoin"),
        ("mrPnbY1yKDBsdgbHbS7kJ8GVm8F66hWHLE", "testnet"),
        ("n2ekxibY5keRiMaoKFGfiNfXQCS4zTUpct", "testnet"),
        ("2NBSBcf2KfjPEEqVusmrWdmUeNHRiUTS3Li", "testnet"),
    ];

    fn hex_bytes(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    fn multisig_keys(order: &[&str]) -> Vec<Vec<u8>> {
        order.iter().map(|k| hex_bytes(k)).collect()
    }

    fn decode_reason(s: &str) -> Option<Base58CheckError> {
        match Address::from_string(s).invalid_reason() {
            Some(InvalidReason::Decode(e)) => Some(e.clone()),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_valid_addresses() {
        for (s, network) in VALID {
            let address = Address::from_string(s);
            assert!(address.is_valid(), "{} should be valid", s);
            assert_eq!(address.network().unwrap().name, *network, "{}", s);
            assert!(address.invalid_reason().is_none());
        }
    }

    #[test]
    fn test_invalid_characters() {
        for s in [
            "1AGNa15ZQXAZUgFiqJ2i7Z2DPU2J6hW600",
            "1AGNa15ZQXAZUgFiqJ2i7Z2DPU2J6hW620",
            "1A Na15ZQXAZUgFiqJ2i7Z2DPU2J6hW62i",
            "1ANNa15ZQXAZUgFiqJ2i7Z2DPU2J6hW62!",
            "!",
            " ",
            "0",
        ] {
            let address = Address::from_string(s);
            assert!(!address.is_valid(), "{}", s);
            assert!(
                matches!(decode_reason(s), Some(Base58CheckError::InvalidCharacter { .. })),
                "{}",
                s
            );
        }
    }

    #[test]
    fn test_bad_checksums() {
        for s in [
            "1ANNa15ZQXAZUgFiqJ2i7Z2DPU2J6hW62i",
            "1ANNa15ZQXAZUgFiqJ2i7Z2DPU2J6hW62j",
            "DbiBUHm5nmKAypAZUaicLvMBAqGHj3GA1a",
            "DQCBqDw1hTNAwBLYL8naUBXduvxs6cu59h",
        ] {
            assert_eq!(decode_reason(s), Some(Base58CheckError::BadChecksum), "{}", s);
        }
    }

    #[test]
    fn test_bad_lengths() {
        let cases = [
            ("1ANNa15ZQXAZUgFiqJ2i7Z2DPU2J6hW62iz", 26),
            ("1ANNa15ZQXAZUgFiqJ2i7Z2DPU2J6hW62izz", 27),
            ("2cFupjhnEsSn59qHXstmK2ffpLv2", 20),
            ("1T", 2),
            ("11111111111111111111111111122222234", 33),
            ("32QBdjycLwbDTuGafUwaU5p5GxzSLPYoF", 24),
            ("32QBdjycLwbDTuGafUwaU5p5GxzSLPYoF6z", 26),
        ];
        for (s, got) in cases {
            assert_eq!(
                decode_reason(s),
                Some(Base58CheckError::BadLength { expected: 25, got }),
                "{}",
                s
            );
        }
    }

    /// Well-formed payloads whose version byte no network uses.
    #[test]
    fn test_unknown_versions() {
        for (s, version) in [
            ("dB7cwYdcPSgiyAwKWL3JwCVwSk6epU2txw", 0x59),
            ("2MnmgiRH4eGLyLc9eAqStzk7dFgBjFtUCtu", 0xc3),
        ] {
            let address = Address::from_string(s);
            assert!(!address.is_valid());
            assert!(matches!(
                address.invalid_reason(),
                Some(InvalidReason::UnknownVersion { version: v, .. }) if *v == version
            ));
            assert_eq!(address.version(), Some(version));
            assert!(address.hash().is_some());
            assert!(address.role().is_none());
        }
    }

    #[test]
    fn test_validate_reports_reason() {
        assert_eq!(
            Address::from_string("mrPnbY1yKDBsdgbHbS7kJ8GVm8F66hWHLE").validate().unwrap().network,
            &TESTNET
        );
        assert!(matches!(
            Address::from_string("dB7cwYdcPSgiyAwKWL3JwCVwSk6epU2txw").validate(),
            Err(ScriptError::UnknownVersion(0x59))
        ));
        assert!(matches!(
            Address::from_string("1T").validate(),
            Err(ScriptError::Primitives(PrimitivesError::Base58Check(
                Base58CheckError::BadLength { expected: 25, got: 2 }
            )))
        ));
    }

    #[test]
    fn test_empty_string_is_invalid() {
        let address = Address::from_string("");
        assert!(!address.is_valid());
        assert_eq!(address.to_string(), "");
        assert!(address.version().is_none());
    }

    // -----------------------------------------------------------------------
    // Network detection
    // -----------------------------------------------------------------------

    #[test]
    fn test_network_of_invalid_address() {
        let err = Address::from_string("1T").network().unwrap_err();
        assert!(matches!(err, ScriptError::NoNetworkMatch(ref s) if s == "1T"));
    }

    #[test]
    fn test_is_script() {
        assert!(!Address::from_string("1T").is_script());
        assert!(Address::from_string("3QRhucKtEn5P9i7YPxzXCqBtPJTPbRFycn").is_script());
        assert!(Address::from_string("sbiBUHm5nmKAypAZUaicLvMBAqGHj3GA1a").is_script());
        assert!(Address::from_string("2NBSBcf2KfjPEEqVusmrWdmUeNHRiUTS3Li").is_script());
        assert!(!Address::from_string("mrPnbY1yKDBsdgbHbS7kJ8GVm8F66hWHLE").is_script());
        assert!(!Address::from_string("DEjzu3Ape6SSD1Ge5Go8NGTFc6nSaH3HTB").is_script());
        assert!(!Address::from_string("DbiBUHm5nmKAypAZUaicLvMBAqGHj3GA1a").is_script());
    }

    #[test]
    fn test_resolved_fields() {
        let address = Address::from_string("1dice8EMZmqKvrGE4Qc9bUFf9PX3xaYDp");
        match address.state() {
            AddressState::Valid(resolved) => {
                assert_eq!(resolved.version, 0x00);
                assert_eq!(hex::encode(resolved.hash), "06f1b66ffe49df7fce684df16c62f59dc9adbd3f");
                assert_eq!(resolved.network, &BITCOIN);
                assert_eq!(resolved.role, AddressRole::PubKeyHash);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    // -----------------------------------------------------------------------
    // State machine
    // -----------------------------------------------------------------------

    #[test]
    fn test_state_starts_unparsed() {
        let address = Address::from_string("1Q1pE5vPGEEMqRcVRMbtBK842Y6Pzo6nK9");
        assert_eq!(address.current_state(), &AddressState::Unparsed);
        assert!(address.is_valid());
        assert!(matches!(address.current_state(), AddressState::Valid(_)));
    }

    /// Once resolved, repeated queries see the same state.
    #[test]
    fn test_state_is_terminal() {
        let address = Address::from_string("1ANNa15ZQXAZUgFiqJ2i7Z2DPU2J6hW62j");
        let first = address.state().clone();
        assert!(!address.is_valid());
        let _ = address.network();
        let _ = address.to_string();
        assert_eq!(address.state(), &first);
        assert_eq!(address.current_state(), &first);
    }

    #[test]
    fn test_to_string_is_idempotent() {
        let inputs = VALID
            .iter()
            .map(|(s, _)| *s)
            .chain(["1T", "", "!", "DbiBUHm5nmKAypAZUaicLvMBAqGHj3GA1a"]);
        for s in inputs {
            let address = Address::from_string(s);
            let first = address.to_string();
            let valid = address.is_valid();
            assert_eq!(address.to_string(), first);
            assert_eq!(address.is_valid(), valid);
            assert_eq!(first, s);
        }
    }

    #[test]
    fn test_shared_between_threads() {
        let address = Address::from_string("n2ekxibY5keRiMaoKFGfiNfXQCS4zTUpct");
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert!(address.is_valid());
                    assert_eq!(address.network().unwrap(), &TESTNET);
                });
            }
        });
    }

    #[test]
    fn test_equality_follows_text() {
        let a = Address::from_string("1T");
        let b: Address = "1T".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Address::from("1U"));
    }

    #[test]
    fn test_serde_as_string() {
        let address = Address::from_string("32QBdjycLwbDTuGafUwaU5p5GxzSLPYoF6");
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"32QBdjycLwbDTuGafUwaU5p5GxzSLPYoF6\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
        assert!(back.is_valid());
    }

    // -----------------------------------------------------------------------
    // Explicit version and hash
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_version_hash() {
        let hash = hex_bytes("06f1b66ffe49df7fce684df16c62f59dc9adbd3f");
        let address = Address::from_version_hash(0x00, &hash).unwrap();
        assert_eq!(address.to_string(), "1dice8EMZmqKvrGE4Qc9bUFf9PX3xaYDp");
        assert!(address.is_valid());
    }

    #[test]
    fn test_from_version_hash_bad_length() {
        let err = Address::from_version_hash(0x00, &[0u8; 19]).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidHashLength(19)));
    }

    /// An unregistered version still renders as its encoding.
    #[test]
    fn test_from_version_hash_unknown_version() {
        let address = Address::from_version_hash(0x59, &[0u8; 20]).unwrap();
        assert!(!address.is_valid());
        assert!(!address.is_script());
        assert_eq!(address.to_string(), encode_address(0x59, &[0u8; 20]));
        assert!(matches!(address.network(), Err(ScriptError::NoNetworkMatch(_))));
        assert_eq!(address.version(), Some(0x59));
    }

    // -----------------------------------------------------------------------
    // From public keys
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_pub_key_bitcoin() {
        let pubkey = hex_bytes(PUBKEY_UNCOMPRESSED);
        let address = Address::from_pub_key(&pubkey, "bitcoin").unwrap();
        assert_eq!(address.to_string(), "1PoCUtm4v5NBazsv1UuQq9RUFgpZsfwhqR");
        assert_eq!(address.hash(), Some(hash160(&pubkey)));
        assert!(!address.is_script());
    }

    #[test]
    fn test_from_pub_key_dicecoin() {
        let pubkey = hex_bytes(PUBKEY_UNCOMPRESSED);
        let address = Address::from_pub_key(&pubkey, "dicecoin").unwrap();
        assert_eq!(address.to_string(), "DEjzu3Ape6SSD1Ge5Go8NGTFc6nSaH3HTB");
        assert_eq!(address.network().unwrap(), &DICECOIN);
        assert_eq!(address.hash(), Some(DICECOIN.pubkey_hash(&pubkey)));
    }

    #[test]
    fn test_from_pub_key_unknown_network() {
        let err = Address::from_pub_key(&[0x02; 33], "livenet").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownNetwork(ref n) if n == "livenet"));
    }

    #[test]
    fn test_from_key_private_compressed() {
        let key = PrivateKey::from_hex(PRIV_HEX).unwrap();
        assert_eq!(
            Address::from_key(&key, "bitcoin").unwrap().to_string(),
            "16wnkefzwuSehzuiGh9jrWWJEskxCsBL4u"
        );
        assert_eq!(
            Address::from_key(&key, "dicecoin").unwrap().to_string(),
            "DKZjzcTfnCmnhiuwG4Mu9KfUyrwgomeJBF"
        );
        assert_eq!(
            Address::from_key(&key, "testnet").unwrap().to_string(),
            "mmTk3hkykvsuV7PKzG87gRid6sMfAouW9q"
        );
    }

    #[test]
    fn test_from_key_private_uncompressed() {
        let mut key = PrivateKey::from_hex(PRIV_HEX).unwrap();
        key.set_compressed(false);
        assert_eq!(
            Address::from_key(&key, "bitcoin").unwrap().to_string(),
            "17GXX5XP6d3Vr9yZFuzD7JWhaHU9AatD6y"
        );
        assert_eq!(
            Address::from_key(&key, "dicecoin").unwrap().to_string(),
            "DAApiUhs1U7XKXNEkfPXFbbLwyFo4UPfXN"
        );
    }

    /// A public key object and its serialized bytes give the same address.
    #[test]
    fn test_from_key_public_matches_bytes() {
        let key = PrivateKey::from_hex(PRIV_HEX).unwrap().pub_key();
        let from_key = Address::from_key(&key, "dicecoin").unwrap();
        let from_bytes = Address::from_pub_key(&key.to_bytes(), "dicecoin").unwrap();
        assert_eq!(from_key, from_bytes);
    }

    // -----------------------------------------------------------------------
    // Multisig and scripts
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_pub_keys_sorted() {
        let keys = multisig_keys(&[KEY1, KEY2, KEY3]);
        let opts = MultisigOptions::default();
        let cases = [
            ("bitcoin", "3KyC8ZTVJFg5hceWvLVojWTPXVAkTwMrAj"),
            ("testnet", "2NBXQCJPWuiBRuQH4bU7gMTSejqNvBLDzN5"),
            ("dicecoin", "scXaHbE4VuHDqdNurgU3vZ7o425wm37hpC"),
        ];
        for (network, expected) in cases {
            let address = Address::from_pub_keys(2, &keys, network, opts).unwrap();
            assert_eq!(address.to_string(), expected);
            assert!(address.is_script());
        }
    }

    #[test]
    fn test_from_pub_keys_order_independent() {
        let opts = MultisigOptions::default();
        let a = Address::from_pub_keys(2, &multisig_keys(&[KEY1, KEY2, KEY3]), "bitcoin", opts).unwrap();
        let b = Address::from_pub_keys(2, &multisig_keys(&[KEY2, KEY3, KEY1]), "bitcoin", opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_pub_keys_no_sorting() {
        let opts = MultisigOptions::unsorted();
        let given = Address::from_pub_keys(2, &multisig_keys(&[KEY1, KEY2, KEY3]), "bitcoin", opts).unwrap();
        assert_eq!(given.to_string(), "3NVARTAgp9e7e1mF82i8BftwbuWm14hKyp");
        let reversed = Address::from_pub_keys(2, &multisig_keys(&[KEY3, KEY2, KEY1]), "bitcoin", opts).unwrap();
        assert_eq!(reversed.to_string(), "3KyC8ZTVJFg5hceWvLVojWTPXVAkTwMrAj");
    }

    #[test]
    fn test_from_pub_keys_errors() {
        let keys = multisig_keys(&[KEY1, KEY2]);
        let opts = MultisigOptions::default();
        assert!(matches!(
            Address::from_pub_keys(3, &keys, "bitcoin", opts),
            Err(ScriptError::InvalidThreshold { required: 3, total: 2 })
        ));
        assert!(matches!(
            Address::from_pub_keys(1, &keys, "nope", opts),
            Err(ScriptError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_from_script_matches_from_pub_keys() {
        let keys = multisig_keys(&[KEY1, KEY2, KEY3]);
        let opts = MultisigOptions::default();
        let script = Script::multisig(2, &keys, opts).unwrap();
        for network in ["bitcoin", "testnet", "dicecoin"] {
            assert_eq!(
                Address::from_script(&script, network).unwrap(),
                Address::from_pub_keys(2, &keys, network, opts).unwrap()
            );
        }
        let from_hex = Address::from_script_hex(&script.to_hex(), "bitcoin").unwrap();
        assert_eq!(from_hex.to_string(), "3KyC8ZTVJFg5hceWvLVojWTPXVAkTwMrAj");
    }

    #[test]
    fn test_from_script_p2pkh_redeem_script() {
        let address =
            Address::from_script_hex("76a914774e603bafb717bd3f070e68bbcccfd907c77d1388ac", "testnet")
                .unwrap();
        assert_eq!(address.to_string(), "2MsRE5jYEA51YBRATidAx8xHyZNvraVPRX2");
    }

    #[test]
    fn test_from_script_bad_hex() {
        assert!(matches!(
            Address::from_script_hex("zz", "bitcoin"),
            Err(ScriptError::InvalidHex(_))
        ));
    }

    // -----------------------------------------------------------------------
    // From output scripts
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_script_pub_key_single() {
        let cases = [
            ("76a91423b7530a00dd7951e11791c529389421c0b8d83b88ac", "mimoZNLcP2rrMRgdeX5PSnR7AjCqQveZZ4"),
            ("a9147049be48e74a660157da3ed64569981592f7fa0587", "2N3Ux1YTnt1ixofYvJfaabqZSj2MBF3jsmv"),
            ("76a914774e603bafb717bd3f070e68bbcccfd907c77d1388ac", "mrPnbY1yKDBsdgbHbS7kJ8GVm8F66hWHLE"),
            ("76a914b00127584485a7cff0949ef0f6bc5575f06ce00d88ac", "mwZabyZXg8JzUtFX1pkGygsMJjnuqiNhgd"),
        ];
        for (script_hex, expected) in cases {
            match Address::from_script_pub_key_hex(script_hex, "testnet").unwrap() {
                Destinations::Single(address) => assert_eq!(address.to_string(), expected),
                other => panic!("unexpected destinations {:?}", other),
            }
        }
    }

    #[test]
    fn test_from_script_pub_key_bare_multisig() {
        let script = Script::multisig(2, &multisig_keys(&[KEY1, KEY2, KEY3]), MultisigOptions::default())
            .unwrap();
        let destinations = Address::from_script_pub_key(&script, "testnet").unwrap();
        assert!(matches!(destinations, Destinations::Multiple(_)));
        assert_eq!(destinations.len(), 3);
        let strings: Vec<String> = destinations.into_vec().iter().map(|a| a.to_string()).collect();
        assert_eq!(
            strings,
            vec![
                "mrevvwcYX852g2a4Wd4nvES2poPkF8uBeu",
                "mkhUBGXMU9akRrqmpE6TVq1S2uSX3MUmzF",
                "mvN9xNpR4PSjNvXZojBUQpLfwL4HFCuJ7w",
            ]
        );
    }

    /// Bare multisig keys are hashed with the network's pubkey digest.
    #[test]
    fn test_from_script_pub_key_bare_multisig_dicecoin() {
        let keys = multisig_keys(&[KEY1, KEY2]);
        let script = Script::multisig(1, &keys, MultisigOptions::unsorted()).unwrap();
        let destinations = Address::from_script_pub_key(&script, "dicecoin").unwrap();
        let hashes: Vec<_> = destinations.as_slice().iter().map(|a| a.hash().unwrap()).collect();
        assert_eq!(hashes, vec![DICECOIN.pubkey_hash(&keys[0]), DICECOIN.pubkey_hash(&keys[1])]);
    }

    #[test]
    fn test_from_script_pub_key_unrecognized() {
        let err = Address::from_script_pub_key_hex("6a0568656c6c6f", "bitcoin").unwrap_err();
        assert!(matches!(err, ScriptError::UnrecognizedScript));
        let err = Address::from_script_pub_key(&Script::new(), "bitcoin").unwrap_err();
        assert!(matches!(err, ScriptError::UnrecognizedScript));
    }

    // -----------------------------------------------------------------------
    // Custom registries
    // -----------------------------------------------------------------------

    static REGTEST_ONLY: [NetworkProfile; 1] = [NetworkProfile::new(
        "regtest",
        0x6f,
        0xc4,
        crate::network::PubkeyDigestKind::Hash160,
    )];
    static REGTEST_REGISTRY: NetworkRegistry<'static> = NetworkRegistry::new(&REGTEST_ONLY);

    #[test]
    fn test_custom_registry() {
        let address = Address::from_string_in("mrPnbY1yKDBsdgbHbS7kJ8GVm8F66hWHLE", &REGTEST_REGISTRY);
        assert_eq!(address.network().unwrap().name, "regtest");
        assert!(!Address::from_string_in("1dice8EMZmqKvrGE4Qc9bUFf9PX3xaYDp", &REGTEST_REGISTRY).is_valid());

        let derived = Address::from_pub_key_in(&[0x02; 33], "regtest", &REGTEST_REGISTRY).unwrap();
        assert!(derived.is_valid());
        assert!(Address::from_pub_key_in(&[0x02; 33], "bitcoin", &REGTEST_REGISTRY).is_err());
    }
}
