//! Statement authentication with the authority's Ed25519 keypair.
//!
//! Signing is a separate step from construction because the signing key
//! is typically not in the same process that assembles statements (HSM,
//! remote signer, air-gapped authority). The signed message is the
//! statement's canonical element sequence, digested under the statement
//! hash context — exactly the bytes [`content_hash`] covers.
//!
//! [`content_hash`]: AccountStatement::content_hash

use crate::config::STATEMENT_HASH_CONTEXT;
use crate::crypto::keys::{AuthorityKeypair, AuthorityPublicKey, AuthoritySignature};
use crate::crypto::signatures::{sign_elements, verify_elements};

use super::types::AccountStatement;

impl AccountStatement {
    /// Signs the statement's canonical encoding with the authority key.
    ///
    /// Deterministic: the same statement under the same key always yields
    /// the same signature. The statement itself is untouched — signatures
    /// travel next to statements, never inside them, so signing cannot
    /// perturb the very bytes being signed.
    pub fn sign(&self, authority: &AuthorityKeypair) -> AuthoritySignature {
        sign_elements(authority, STATEMENT_HASH_CONTEXT, &self.serialize())
    }

    /// Checks an authority signature over this statement.
    ///
    /// Recomputes the canonical encoding and verifies against it, so any
    /// post-signing mutation of any field — header or transaction —
    /// flips the result to `false`. This is a non-aborting boolean query;
    /// the [validator](crate::validator) is the layer that escalates a
    /// `false` into a terminal error.
    pub fn verify_signature(
        &self,
        authority: &AuthorityPublicKey,
        signature: &AuthoritySignature,
    ) -> bool {
        verify_elements(authority, STATEMENT_HASH_CONTEXT, &self.serialize(), signature)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
