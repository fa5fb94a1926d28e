//! Key material held by a drand participant.
//!
//! - [`Pair`] / [`Identity`] — long-term identity key and its public half.
//! - [`Share`] — the participant's secret share of the distributed key.
//! - [`DistPublic`] — the group's distributed public key.
//! - [`Group`] — the public roster of participants.
//!
//! Every type implements [`crate::storage::Tomler`]; binary values are
//! written as lowercase hex.

pub mod group;
pub mod pair;
pub mod share;

pub use group::{Group, GroupToml};
pub use pair::{Identity, Pair, PairToml, PublicToml};
pub use share::{DistPublic, DistPublicToml, Share, ShareToml};

use zeroize::Zeroizing;

use crate::error::{Result, StoreError};

/// Decode a hex string into exactly 32 bytes.
///
/// The intermediate buffer is wiped; the caller owns the returned copy.
pub(crate) fn decode_hex32(entity: &'static str, field: &str, value: &str) -> Result<[u8; 32]> {
    let bytes = Zeroizing::new(
        hex::decode(value)
            .map_err(|e| StoreError::decode(entity, format!("{field} is not valid hex: {e}")))?,
    );
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        StoreError::decode(
            entity,
            format!("{field} must be 32 bytes, got {}", bytes.len()),
        )
    })
}
