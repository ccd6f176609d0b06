//! # Hashing Utilities
//!
//! BLAKE3-based hashing for the attestation protocol. Two jobs:
//!
//! - **Digesting field-element sequences** — the canonical statement
//!   encoding is a `Vec<Fr>`; signing and content-addressing both go
//!   through a single collision-resistant digest of that sequence.
//! - **Mapping bytes to field elements** — account and transaction
//!   identifiers arrive as arbitrary byte strings (account numbers,
//!   external references) and need a uniform embedding into Fr.
//!
//! Every digest here is domain-separated with BLAKE3's `derive_key` mode.
//! Don't prepend tags manually — `derive_key` mixes the context into the
//! IV, which makes cross-context collisions impossible by construction.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use ark_serialize::CanonicalSerialize;

use crate::config::FIELD_DERIVE_CONTEXT;

/// Digest an ordered sequence of field elements under a domain context.
///
/// Each element is fed to the hasher in its canonical compressed form
/// (32 little-endian bytes for BN254's scalar field), in sequence order.
/// Because every element contributes a fixed-width block, the digest of
/// `[a, b]` can never collide with `[ab]`-style reshufflings — no length
/// ambiguity, no separator games.
pub fn hash_elements(context: &str, elements: &[Fr]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    let mut buf = [0u8; 32];
    for element in elements {
        element
            .serialize_compressed(&mut buf[..])
            .expect("field element serialization into a 32-byte buffer must not fail");
        hasher.update(&buf);
    }
    *hasher.finalize().as_bytes()
}

/// Map arbitrary bytes to a BN254 scalar field element.
///
/// Hash-and-reduce: BLAKE3 with the protocol's derivation context, then
/// interpret the 32-byte digest as a little-endian integer reduced modulo
/// the field order. The bias is negligible (< 2^-128) because the digest
/// is 256 bits against a ~254-bit modulus.
pub fn hash_to_field(data: &[u8]) -> Fr {
    let mut hasher = blake3::Hasher::new_derive_key(FIELD_DERIVE_CONTEXT);
    hasher.update(data);
    Fr::from_le_bytes_mod_order(hasher.finalize().as_bytes())
}
