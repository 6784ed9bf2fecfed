//! Network profiles and the address version-byte registry.
//!
//! A network profile names a chain, its P2PKH and P2SH version bytes, and
//! the digest used to turn a public key into its 20-byte address hash.
//! The default registry is a `static` table; it is never mutated, so it is
//! shared freely between threads.

use serde::Serialize;

use addrkit_primitives::hash::{hash160, sha256d_160, HASH160_LEN};

use crate::ScriptError;

/// Digest that maps a public key to its 20-byte address hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PubkeyDigestKind {
    /// RIPEMD-160(SHA-256(pubkey)).
    Hash160,
    /// First 20 bytes of SHA-256(SHA-256(pubkey)).
    Sha256d,
}

impl PubkeyDigestKind {
    /// Hash `data` with this digest.
    pub fn digest(self, data: &[u8]) -> [u8; HASH160_LEN] {
        match self {
            PubkeyDigestKind::Hash160 => hash160(data),
            PubkeyDigestKind::Sha256d => sha256d_160(data),
        }
    }
}

/// Hash a redeem script for a P2SH address.
///
/// Always Hash160, independent of the network's public-key digest.
pub fn script_hash(script: &[u8]) -> [u8; HASH160_LEN] {
    hash160(script)
}

/// What a version byte says the 20-byte hash commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressRole {
    /// Hash of a single public key.
    PubKeyHash,
    /// Hash of a redeem script.
    ScriptHash,
}

/// Version bytes and digest choice identifying one chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NetworkProfile {
    /// Unique registry key, e.g. "bitcoin".
    pub name: &'static str,
    /// Version byte of pay-to-pubkey-hash addresses.
    pub pub_key_hash_version: u8,
    /// Version byte of pay-to-script-hash addresses.
    pub p2sh_version: u8,
    /// Digest used for pubkey hashes on this network.
    pub pubkey_digest: PubkeyDigestKind,
}

impl NetworkProfile {
    pub const fn new(
        name: &'static str,
        pub_key_hash_version: u8,
        p2sh_version: u8,
        pubkey_digest: PubkeyDigestKind,
    ) -> Self {
        NetworkProfile {
            name,
            pub_key_hash_version,
            p2sh_version,
            pubkey_digest,
        }
    }

    /// The version byte used for `role` on this network.
    pub fn version_for(&self, role: AddressRole) -> u8 {
        match role {
            AddressRole::PubKeyHash => self.pub_key_hash_version,
            AddressRole::ScriptHash => self.p2sh_version,
        }
    }

    /// Hash a public key with this network's pubkey digest.
    pub fn pubkey_hash(&self, pubkey: &[u8]) -> [u8; HASH160_LEN] {
        self.pubkey_digest.digest(pubkey)
    }

    fn roles_of(&self, version: u8) -> impl Iterator<Item = AddressRole> {
        let pkh = (self.pub_key_hash_version == version).then_some(AddressRole::PubKeyHash);
        let sh = (self.p2sh_version == version).then_some(AddressRole::ScriptHash);
        pkh.into_iter().chain(sh)
    }
}

/// Bitcoin mainnet: addresses start with '1' (P2PKH) or '3' (P2SH).
pub const BITCOIN: NetworkProfile =
    NetworkProfile::new("bitcoin", 0x00, 0x05, PubkeyDigestKind::Hash160);

/// Bitcoin testnet: 'm'/'n' (P2PKH) and '2' (P2SH).
pub const TESTNET: NetworkProfile =
    NetworkProfile::new("testnet", 0x6f, 0xc4, PubkeyDigestKind::Hash160);

/// Dicecoin: 'D' (P2PKH) and 's' (P2SH).
pub const DICECOIN: NetworkProfile =
    NetworkProfile::new("dicecoin", 0x1e, 0x7d, PubkeyDigestKind::Sha256d);

/// Profiles of the default registry.
pub static DEFAULT_NETWORKS: [NetworkProfile; 3] = [BITCOIN, TESTNET, DICECOIN];

static GLOBAL: NetworkRegistry<'static> = NetworkRegistry::new(&DEFAULT_NETWORKS);

/// A read-only table of network profiles.
#[derive(Clone, Copy, Debug)]
pub struct NetworkRegistry<'a> {
    profiles: &'a [NetworkProfile],
}

impl<'a> NetworkRegistry<'a> {
    /// Build a registry over caller-supplied profiles.
    pub const fn new(profiles: &'a [NetworkProfile]) -> Self {
        NetworkRegistry { profiles }
    }

    /// The process-wide default registry.
    pub fn global() -> &'static NetworkRegistry<'static> {
        &GLOBAL
    }

    /// All profiles in registration order.
    pub fn profiles(&self) -> &'a [NetworkProfile] {
        self.profiles
    }

    /// Find a profile by name.
    ///
    /// # Returns
    /// The profile, or `UnknownNetwork` if no profile has that name.
    pub fn lookup_by_name(&self, name: &str) -> Result<&'a NetworkProfile, ScriptError> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ScriptError::UnknownNetwork(name.to_string()))
    }

    /// Every `(profile, role)` pair using `version`, in registration order.
    ///
    /// Empty when no network uses the byte. More than one entry only when
    /// profiles deliberately share a byte.
    pub fn lookup_by_version(&self, version: u8) -> Vec<(&'a NetworkProfile, AddressRole)> {
        self.profiles
            .iter()
            .flat_map(|p| p.roles_of(version).map(move |role| (p, role)))
            .collect()
    }

    /// The first `(profile, role)` pair using `version`.
    pub fn resolve_version(&self, version: u8) -> Option<(&'a NetworkProfile, AddressRole)> {
        self.lookup_by_version(version).into_iter().next()
    }
}
