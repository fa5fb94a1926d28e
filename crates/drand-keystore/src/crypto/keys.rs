//! Ed25519 identity key generation.
//!
//! Identity keys sign the participant's messages; the public half is what
//! the rest of the group knows the participant by.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// Generate a new random Ed25519 signing key.
pub fn generate_signing_key() -> SigningKey {
    SigningKey::generate(&mut rand::thread_rng())
}

/// Reconstruct a verifying key from raw bytes, rejecting invalid points.
pub fn verifying_key_from_bytes(
    bytes: &[u8; 32],
) -> std::result::Result<VerifyingKey, ed25519_dalek::SignatureError> {
    VerifyingKey::from_bytes(bytes)
}

/// Sign `message`, returning the 64 signature bytes.
pub fn sign(signing_key: &SigningKey, message: &[u8]) -> [u8; 64] {
    signing_key.sign(message).to_bytes()
}

/// Check `signature` over `message` against `verifying_key`.
pub fn verify(verifying_key: &VerifyingKey, message: &[u8], signature: &[u8; 64]) -> bool {
    let signature = Signature::from_bytes(signature);
    verifying_key.verify(message, &signature).is_ok()
}
