//! # Protocol Configuration & Constants
//!
//! Every magic number in VERA lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! The encoding widths below define the wire shape of a canonical
//! statement. Changing them invalidates every signature ever produced,
//! so treat them as consensus-critical.

// ---------------------------------------------------------------------------
// Canonical Encoding Layout
// ---------------------------------------------------------------------------

/// Number of field elements in the statement header: account id, closing
/// balance, period start, period end, issued-at. In that order, always.
pub const STATEMENT_HEADER_WIDTH: usize = 5;

/// Number of field elements per encoded transaction: id, amount, the four
/// classification flags (each 0 or 1), timestamp.
pub const TX_RECORD_WIDTH: usize = 7;

// ---------------------------------------------------------------------------
// Domain Separation
// ---------------------------------------------------------------------------

/// BLAKE3 `derive_key` context for hashing a statement's canonical
/// encoding. Content hashes and signatures are bound to this context, so
/// a statement digest can never collide with any other protocol object.
pub const STATEMENT_HASH_CONTEXT: &str = "vera-protocol/statement-digest/v1";

/// BLAKE3 `derive_key` context for mapping arbitrary bytes to a field
/// element (account and transaction identifiers).
pub const FIELD_DERIVE_CONTEXT: &str = "vera-protocol/hash-to-field/v1";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 — deterministic signatures, 128-bit security, no k-value
/// footguns. The authority signs statement digests with this and nothing
/// else.
pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Ed25519 secret keys are 32 bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Ed25519 public (verifying) keys are 32 bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signatures are 64 bytes. If yours isn't, something has gone
/// terribly wrong.
pub const SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Encoding version string. Bump on any change to the canonical layout —
/// that's a hard fork of every stored signature.
pub const PROTOCOL_VERSION: &str = "0.1.0";
