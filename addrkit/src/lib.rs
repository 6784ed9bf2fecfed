#![deny(missing_docs)]

//! Address toolkit.
//!
//! Re-exports all toolkit components for convenient single-crate usage.

pub use addrkit_primitives as primitives;
pub use addrkit_script as script;

pub use addrkit_script::{Address, Destinations, MultisigOptions, NetworkRegistry, Script};
