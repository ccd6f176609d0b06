//! # Statement Module
//!
//! The account-statement data model, its canonical field-element codec,
//! and authority authentication.
//!
//! ## Architecture
//!
//! ```text
//! types.rs — Value objects (TransactionClass, Transaction, AccountStatement)
//! codec.rs — Canonical serialize/deserialize + content hashing
//! auth.rs  — Authority signing and signature verification
//! ```
//!
//! ## Statement lifecycle
//!
//! 1. **Build** — the authority assembles an [`AccountStatement`] from
//!    ledger data, transactions ordered earliest-first.
//! 2. **Encode** — [`AccountStatement::serialize`] flattens it into the
//!    canonical element sequence.
//! 3. **Sign** — [`AccountStatement::sign`] binds the encoding to the
//!    authority's Ed25519 key.
//! 4. **Validate** — a holder hands statement + signature + required
//!    proofs to the [validator](crate::validator).
//!
//! ## Design Decisions
//!
//! - Equality is structural and coincides with element-wise equality of
//!   canonical encodings — there is exactly one encoding per statement.
//! - The transaction count is derived from the encoding length, never
//!   stored; a length that doesn't divide evenly is malformed, full stop.
//! - All amounts are 64-bit integers in the smallest denomination. No
//!   floating point anywhere near monetary values.

pub mod auth;
pub mod codec;
pub mod types;

pub use codec::CodecError;
pub use types::{AccountStatement, ClassFlag, Transaction, TransactionClass};
