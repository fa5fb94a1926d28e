//! Distributed key material produced by a DKG run.
//!
//! A [`Share`] is private to the participant and stored owner-only in
//! `dist_key.private`; the [`DistPublic`] commitments are shared by the
//! whole group and stored in `dist_key.public`.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::decode_hex32;
use crate::error::{Result, StoreError};
use crate::storage::Tomler;

/// The local participant's secret share of the distributed key.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    index: u32,
    secret: [u8; 32],
}

impl Share {
    /// Build a share from its index in the group and its secret scalar.
    pub fn new(index: u32, secret: [u8; 32]) -> Self {
        Self { index, secret }
    }

    /// Fresh random share, for tests and local setups.
    pub fn random(index: u32) -> Self {
        let mut share = Self::new(index, [0u8; 32]);
        rand::thread_rng().fill_bytes(&mut share.secret);
        share
    }

    /// Index of the owning participant in the group.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Secret scalar bytes.
    pub fn secret(&self) -> &[u8; 32] {
        &self.secret
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("index", &self.index)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// On-disk view of a [`Share`].
#[derive(Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ShareToml {
    #[serde(rename = "Index")]
    pub index: u32,
    #[serde(rename = "Share")]
    pub share: String,
}

impl Tomler for Share {
    type Toml = ShareToml;
    const NAME: &'static str = "share";

    fn to_toml(&self) -> ShareToml {
        ShareToml {
            index: self.index,
            share: hex::encode(self.secret),
        }
    }

    fn from_toml(&mut self, value: ShareToml) -> Result<()> {
        self.secret.zeroize();
        self.secret = decode_hex32(Self::NAME, "share", &value.share)?;
        self.index = value.index;
        Ok(())
    }
}

/// The group's distributed public key: the public commitments of the
/// shared polynomial, constant term first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DistPublic {
    coefficients: Vec<[u8; 32]>,
}

impl DistPublic {
    /// Build from the commitment points, constant term first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Decode` if `coefficients` is empty.
    pub fn new(coefficients: Vec<[u8; 32]>) -> Result<Self> {
        check_not_empty(coefficients.len())?;
        Ok(Self { coefficients })
    }

    /// The group's collective public key, if any commitment is present.
    pub fn key(&self) -> Option<&[u8; 32]> {
        self.coefficients.first()
    }

    /// All commitment points.
    pub fn coefficients(&self) -> &[[u8; 32]] {
        &self.coefficients
    }
}

fn check_not_empty(count: usize) -> Result<()> {
    if count == 0 {
        return Err(StoreError::decode(DistPublic::NAME, "no coefficients"));
    }
    Ok(())
}

/// On-disk view of a [`DistPublic`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistPublicToml {
    #[serde(rename = "Coefficients")]
    pub coefficients: Vec<String>,
}

impl Tomler for DistPublic {
    type Toml = DistPublicToml;
    const NAME: &'static str = "distributed public key";

    fn to_toml(&self) -> DistPublicToml {
        DistPublicToml {
            coefficients: self.coefficients.iter().map(hex::encode).collect(),
        }
    }

    fn from_toml(&mut self, value: DistPublicToml) -> Result<()> {
        check_not_empty(value.coefficients.len())?;
        self.coefficients = value
            .coefficients
            .iter()
            .map(|c| decode_hex32(Self::NAME, "coefficient", c))
            .collect::<Result<_>>()?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_not_empty(self.coefficients.len())
    }
}
