//! Ed25519 identity key generation and reconstruction.

pub mod keys;
