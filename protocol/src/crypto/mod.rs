//! # Cryptographic Primitives for VERA
//!
//! Everything security-relevant in the attestation pipeline flows through
//! here: the domain hash over field-element sequences, authority key
//! management, and statement signing.
//!
//! We deliberately chose boring, well-audited cryptography:
//!
//! - **Ed25519** for authority signatures — fast, deterministic, unbroken.
//! - **BLAKE3** for hashing — keyed derivation gives us free domain
//!   separation between protocol contexts.
//! - **BN254/Fr** (arkworks) as the encoding field — the scalar field the
//!   surrounding proof-system ecosystem already speaks.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Everything here is a thin, type-safe wrapper around audited
//! implementations. If you're tempted to optimize these functions, please
//! reconsider. Then reconsider again.

pub mod hash;
pub mod keys;
pub mod signatures;

// Re-export the things people actually need so they don't have to memorize
// our module hierarchy.
pub use hash::{hash_elements, hash_to_field};
pub use keys::{AuthorityKeypair, AuthorityPublicKey, AuthoritySignature, KeyError};
pub use signatures::{sign_elements, verify_elements};
