// Copyright (c) 2026 VERA Core Developers. MIT License.
// See LICENSE for details.

//! # VERA Protocol — Core Library
//!
//! VERA lets a financial authority attest to facts about a customer's
//! transaction history ("average monthly balance exceeds X") without
//! handing over the full statement. The statement is flattened into a
//! canonical sequence of prime-field elements, signed by the authority,
//! and threshold predicates are evaluated over it with exact integer
//! arithmetic — no floating point anywhere near money.
//!
//! VERA takes a pragmatic stance on primitives: Ed25519 for authority
//! signatures (deterministic, boring, unbroken), BN254's scalar field for
//! the canonical encoding (the field every proof system already speaks),
//! and BLAKE3 for content hashing (because we live in the future).
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of an
//! attestation pipeline:
//!
//! - **crypto** — Field hashing and Ed25519 authority keys. Don't roll your own.
//! - **num** — Range-checked 64-bit integers embedded in the field.
//! - **statement** — The statement data model and its canonical codec.
//! - **aggregate** — Balance reconstruction and ranged aggregation queries.
//! - **validator** — Signature authentication plus threshold-predicate checks.
//! - **config** — Protocol constants. All of them. In one place.
//!
//! ## Data flow
//!
//! A statement is built → signed by the authority → handed, together with
//! the signature and a list of required proofs, to a
//! [`TransactionalProof`](validator::TransactionalProof) → the validator
//! authenticates, then evaluates each predicate against the aggregation
//! engine, aborting on the first failure.
//!
//! ## Design Philosophy
//!
//! 1. Correctness over performance (every pass is linear anyway).
//! 2. Everything is a value object — build once, never mutate.
//! 3. A violated predicate is a typed error, never a silent wrong answer.
//! 4. If it touches money, it has tests. Plural.

pub mod aggregate;
pub mod config;
pub mod crypto;
pub mod num;
pub mod statement;
pub mod validator;

pub use num::{Int64, Uint64};
pub use statement::{AccountStatement, ClassFlag, Transaction, TransactionClass};
pub use validator::{
    RequiredProof, RequiredProofKind, RequiredProofs, TransactionalProof, ValidationError,
};
