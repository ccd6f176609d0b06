//! # Authority Key Management
//!
//! Ed25519 keypairs for the attesting authority. The authority is the
//! only signer in this protocol: it signs statement digests, and
//! validators hold just its public key.
//!
//! ## Why Ed25519?
//!
//! - Deterministic signatures (no k-value footguns like ECDSA).
//! - 128-bit security level in 32+32 bytes. Compact and sufficient.
//! - Constant-time implementations exist and are well-audited.
//!
//! ## Security considerations
//!
//! - Key generation uses the OS CSPRNG (`OsRng`). If that's broken,
//!   statement attestations are the least of your worries.
//! - Secret key bytes are never logged and never appear in `Debug`
//!   output. If you add logging to this module, you will be asked to
//!   leave.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors from key parsing. Intentionally vague about *why* — leaking
/// details about key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// The attesting authority's Ed25519 keypair.
///
/// Deliberately does NOT implement `Serialize`/`Deserialize` — exporting
/// a private key should be a conscious act (`to_bytes`), not something
/// that happens because a keypair ended up in a JSON response.
pub struct AuthorityKeypair {
    signing_key: SigningKey,
}

/// The public half of an authority identity, safe to distribute to every
/// validator. This is what a compliance check trusts.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityPublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a statement digest. 64 bytes, deterministic
/// for a given (key, digest) pair.
///
/// Stored as `Vec<u8>` for serde compatibility, but always exactly 64
/// bytes when produced by this crate. A malformed signature simply fails
/// verification — no panics, just `false`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoritySignature {
    bytes: Vec<u8>,
}

impl AuthorityKeypair {
    /// Generate a fresh authority keypair from the OS CSPRNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic construction from a 32-byte seed. In Ed25519 the
    /// seed *is* the secret key. A weak seed makes a weak key — use a
    /// proper CSPRNG or KDF to produce it.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Load a keypair from a hex-encoded secret key. Devnet convenience;
    /// production keys belong in real key management, not config files.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SECRET_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// The public key validators should pin.
    pub fn public_key(&self) -> AuthorityPublicKey {
        AuthorityPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message (in this protocol: always a 32-byte statement
    /// digest). Deterministic per RFC 8032 — no nonce management, no
    /// sleepless nights about RNG state at signing time.
    pub fn sign(&self, message: &[u8]) -> AuthoritySignature {
        AuthoritySignature {
            bytes: self.signing_key.sign(message).to_bytes().to_vec(),
        }
    }

    /// Verify against this keypair's own public key. Convenience for
    /// tests and round-trips.
    pub fn verify(&self, message: &[u8], signature: &AuthoritySignature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Export the raw 32-byte secret. **Handle with extreme care** — this
    /// is everything an attacker needs to mint forged attestations.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for AuthorityKeypair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for AuthorityKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret material. Not even "partially".
        write!(f, "AuthorityKeypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for AuthorityKeypair {
    /// Identity comparison by public key — comparing secret material in a
    /// non-constant-time way is a habit we refuse to pick up.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for AuthorityKeypair {}

// ---------------------------------------------------------------------------
// AuthorityPublicKey
// ---------------------------------------------------------------------------

impl AuthorityPublicKey {
    /// Wrap raw bytes without validation. For bytes of unknown origin,
    /// prefer [`try_from_slice`](Self::try_from_slice).
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Parse and validate a public key from a byte slice. Rejects wrong
    /// lengths and byte patterns that are not valid Ed25519 points
    /// (low-order points and other degenerate cases included).
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature against this key. A plain boolean — callers of
    /// this predicate want yes/no, and a detailed failure oracle helps
    /// nobody but attackers. The *validator* is the layer that escalates
    /// `false` into a typed error.
    pub fn verify(&self, message: &[u8], signature: &AuthoritySignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        verifying_key
            .verify(message, &DalekSignature::from_bytes(&sig_bytes))
            .is_ok()
    }

    /// Hex-encoded representation, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }
}

impl Hash for AuthorityPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for AuthorityPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AuthorityPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthorityPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// AuthoritySignature
// ---------------------------------------------------------------------------

impl AuthoritySignature {
    /// Wrap a raw 64-byte signature.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Raw signature bytes (64 for anything produced by this crate).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded signature, 128 characters when well-formed.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a hex-encoded signature. Rejects anything that is not
    /// exactly 64 bytes.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 64 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for AuthoritySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AuthoritySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "AuthoritySignature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "AuthoritySignature({})", hex_str)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_sign_verify() {
        let kp = AuthorityKeypair::generate();
        let digest = [7u8; 32];
        let sig = kp.sign(&digest);
        assert!(kp.verify(&digest, &sig));
    }

    #[test]
    fn wrong_message_fails() {
        let kp = AuthorityKeypair::generate();
        let sig = kp.sign(&[1u8; 32]);
        assert!(!kp.verify(&[2u8; 32], &sig));
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = AuthorityKeypair::generate();
        let kp2 = AuthorityKeypair::generate();
        let sig = kp1.sign(b"digest");
        assert!(!kp2.public_key().verify(b"digest", &sig));
    }

    #[test]
    fn deterministic_signatures() {
        let kp = AuthorityKeypair::generate();
        let sig1 = kp.sign(b"same digest");
        let sig2 = kp.sign(b"same digest");
        assert_eq!(sig1.as_bytes(), sig2.as_bytes());
    }

    #[test]
    fn deterministic_from_seed() {
        let seed = [42u8; 32];
        assert_eq!(
            AuthorityKeypair::from_seed(&seed).public_key(),
            AuthorityKeypair::from_seed(&seed).public_key()
        );
    }

    #[test]
    fn keypair_hex_round_trip() {
        let kp = AuthorityKeypair::generate();
        let restored = AuthorityKeypair::from_hex(&hex::encode(kp.to_bytes())).unwrap();
        assert_eq!(kp.public_key(), restored.public_key());
    }

    #[test]
    fn invalid_hex_rejected() {
        assert!(AuthorityKeypair::from_hex("deadbeef").is_err());
        assert!(AuthorityKeypair::from_hex("not-hex-at-all").is_err());
    }

    #[test]
    fn public_key_hex_round_trip() {
        let pk = AuthorityKeypair::generate().public_key();
        assert_eq!(AuthorityPublicKey::from_hex(&pk.to_hex()).unwrap(), pk);
    }

    #[test]
    fn public_key_rejects_wrong_length() {
        assert!(AuthorityPublicKey::try_from_slice(&[0u8; 16]).is_err());
    }

    #[test]
    fn public_key_rejects_non_point() {
        // All 0xFF is not a canonical Ed25519 point encoding.
        assert!(AuthorityPublicKey::try_from_slice(&[0xFFu8; 32]).is_err());
    }

    #[test]
    fn signature_hex_round_trip() {
        let sig = AuthorityKeypair::generate().sign(b"x");
        assert_eq!(AuthoritySignature::from_hex(&sig.to_hex()).unwrap(), sig);
    }

    #[test]
    fn truncated_signature_fails_verification_not_panics() {
        let kp = AuthorityKeypair::generate();
        let stub = AuthoritySignature { bytes: vec![0u8; 10] };
        assert!(!kp.public_key().verify(b"digest", &stub));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = AuthorityKeypair::generate();
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("AuthorityKeypair(pub="));
        let secret_hex = hex::encode(kp.to_bytes());
        assert!(!debug_str.contains(&secret_hex));
    }
}
