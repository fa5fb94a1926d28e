//! Long-term identity key pair.
//!
//! The private half is written to `drand_id.private` with owner-only
//! permissions; the public [`Identity`] goes to `drand_id.public` and is
//! what other participants list in their group file.

use std::fmt;

use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::decode_hex32;
use crate::crypto::keys;
use crate::error::{Result, StoreError};
use crate::storage::Tomler;

/// Public identity of a participant: where to reach it and its key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Network address, e.g. `127.0.0.1:8080`.
    pub address: String,
    /// Ed25519 public key bytes.
    pub key: [u8; 32],
    /// Whether the participant serves over TLS.
    pub tls: bool,
}

impl Identity {
    /// Build an identity from its parts.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Decode` if `address` is empty.
    pub fn new(address: impl Into<String>, key: &VerifyingKey, tls: bool) -> Result<Self> {
        let address = address.into();
        check_address(&address)?;
        Ok(Self {
            address,
            key: key.to_bytes(),
            tls,
        })
    }

    /// Public key as lowercase hex.
    pub fn key_hex(&self) -> String {
        hex::encode(self.key)
    }

    /// Parse the stored key bytes as an Ed25519 point.
    ///
    /// Loading only checks the key's length; this is where a bad point shows.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        keys::verifying_key_from_bytes(&self.key)
            .map_err(|e| StoreError::decode(Self::NAME, format!("invalid public key: {e}")))
    }

    /// Check a signature made by the matching [`Pair`].
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        self.verifying_key()
            .map(|key| keys::verify(&key, message, signature))
            .unwrap_or(false)
    }
}

fn check_address(address: &str) -> Result<()> {
    if address.is_empty() {
        return Err(StoreError::decode(Identity::NAME, "missing address"));
    }
    Ok(())
}

/// On-disk view of an [`Identity`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicToml {
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "TLS", default)]
    pub tls: bool,
}

impl Tomler for Identity {
    type Toml = PublicToml;
    const NAME: &'static str = "identity";

    fn to_toml(&self) -> PublicToml {
        PublicToml {
            address: self.address.clone(),
            key: self.key_hex(),
            tls: self.tls,
        }
    }

    fn from_toml(&mut self, value: PublicToml) -> Result<()> {
        check_address(&value.address)?;
        self.key = decode_hex32(Self::NAME, "key", &value.key)?;
        self.address = value.address;
        self.tls = value.tls;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_address(&self.address)
    }
}

/// The participant's identity key pair.
///
/// The signing key is zeroized on drop by `ed25519-dalek`.
#[derive(Clone)]
pub struct Pair {
    key: SigningKey,
    /// Public half, saved separately from the private key.
    pub public: Identity,
}

impl Pair {
    /// Generate a fresh identity reachable at `address`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Decode` if `address` is empty.
    pub fn generate(address: impl Into<String>, tls: bool) -> Result<Self> {
        let key = keys::generate_signing_key();
        let public = Identity::new(address, &key.verifying_key(), tls)?;
        Ok(Self { key, public })
    }

    /// Return a reference to the signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    /// Sign `message` with the identity key.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        keys::sign(&self.key, message)
    }

    /// True when `public.key` is the key derived from the private half.
    pub fn matches_public(&self) -> bool {
        self.key.verifying_key().to_bytes() == self.public.key
    }
}

/// Zero-valued pair, only meaningful as a load target.
impl Default for Pair {
    fn default() -> Self {
        Self {
            key: SigningKey::from_bytes(&[0u8; 32]),
            public: Identity::default(),
        }
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        self.key.as_bytes() == other.key.as_bytes() && self.public == other.public
    }
}

impl Eq for Pair {}

impl fmt::Debug for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pair")
            .field("key", &"<redacted>")
            .field("public", &self.public)
            .finish()
    }
}

/// On-disk view of the private half of a [`Pair`].
#[derive(Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PairToml {
    #[serde(rename = "Key")]
    pub key: String,
}

impl Tomler for Pair {
    type Toml = PairToml;
    const NAME: &'static str = "key pair";

    fn to_toml(&self) -> PairToml {
        PairToml {
            key: hex::encode(self.key.as_bytes()),
        }
    }

    /// Restores the private key and resets `public` to the derived key
    /// with no address; the public file fills in the rest.
    fn from_toml(&mut self, value: PairToml) -> Result<()> {
        let mut secret = decode_hex32(Self::NAME, "key", &value.key)?;
        self.key = SigningKey::from_bytes(&secret);
        secret.zeroize();

        self.public = Identity {
            key: self.key.verifying_key().to_bytes(),
            ..Identity::default()
        };
        Ok(())
    }

    /// The public half is saved right after the private one; refuse both
    /// up front rather than leave a pair that cannot be loaded.
    fn validate(&self) -> Result<()> {
        self.public.validate()
    }
}
