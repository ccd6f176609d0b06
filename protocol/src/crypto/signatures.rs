//! # Signatures over Field-Element Sequences
//!
//! The authority signs canonical encodings, and a canonical encoding is an
//! ordered sequence of field elements. These functions bind the two
//! worlds: digest the sequence under a domain context, then Ed25519-sign
//! the digest.
//!
//! Wrapping the operations (instead of calling ed25519-dalek directly at
//! every call site) gives us one place to audit the message construction —
//! the surest way to sign the wrong bytes is to let every caller assemble
//! them independently.

use ark_bn254::Fr;

use super::hash::hash_elements;
use super::keys::{AuthorityKeypair, AuthorityPublicKey, AuthoritySignature};

/// Sign an ordered sequence of field elements under a domain context.
///
/// The signature covers `BLAKE3_derive_key(context, canonical bytes of
/// each element in order)`. Two sequences with equal elements produce
/// equal digests and therefore (Ed25519 being deterministic) equal
/// signatures under the same key.
pub fn sign_elements(
    keypair: &AuthorityKeypair,
    context: &str,
    elements: &[Fr],
) -> AuthoritySignature {
    keypair.sign(&hash_elements(context, elements))
}

/// Verify a signature over a field-element sequence.
///
/// Recomputes the domain-separated digest and checks the Ed25519
/// signature. A non-aborting boolean predicate: any mismatch — wrong key,
/// tampered element, truncated signature — is simply `false`.
pub fn verify_elements(
    public_key: &AuthorityPublicKey,
    context: &str,
    elements: &[Fr],
    signature: &AuthoritySignature,
) -> bool {
    public_key.verify(&hash_elements(context, elements), signature)
}
