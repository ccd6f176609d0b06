//! Canonical statement codec: a statement to and from a flat, ordered
//! sequence of field elements.
//!
//! The encoding is the protocol's ground truth. Equality, content
//! hashing, and authority signatures are all defined over it, so it has
//! to be a pure, deterministic, total function of the statement — and
//! `deserialize` has to be its exact left inverse.
//!
//! # Layout
//!
//! ```text
//! [0]  account_id
//! [1]  closing_balance
//! [2]  period_start
//! [3]  period_end
//! [4]  issued_at
//! then, per transaction, in statement order:
//! [+0] id
//! [+1] amount            (signed embedding, see num::Int64)
//! [+2] incoming flag     (0 or 1)
//! [+3] outgoing flag     (0 or 1)
//! [+4] fee flag          (0 or 1)
//! [+5] other flag        (0 or 1)
//! [+6] timestamp
//! ```
//!
//! The transaction count is not stored — it is derived from the sequence
//! length, which is why the length must be exactly `5 + 7k`.

use ark_bn254::Fr;
use ark_ff::{One, Zero};
use thiserror::Error;

use crate::config::{STATEMENT_HASH_CONTEXT, STATEMENT_HEADER_WIDTH, TX_RECORD_WIDTH};
use crate::crypto::hash::hash_elements;
use crate::num::{Int64, Uint64};

use super::types::{AccountStatement, Transaction, TransactionClass};

/// Errors from decoding a canonical element sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The sequence length is not `header + k * record` for any whole `k`.
    #[error(
        "malformed encoding: length {len} is not {header} + k * {record} for any whole k",
        header = STATEMENT_HEADER_WIDTH,
        record = TX_RECORD_WIDTH
    )]
    MalformedEncoding { len: usize },

    /// An element at `index` does not decode into its declared range
    /// (a 64-bit integer slot holding a huge element, or a flag slot
    /// holding something other than 0 or 1).
    #[error("element {index} is outside the declared range for its slot")]
    OutOfRangeElement { index: usize },
}

/// Decodes a flag slot. Anything but the canonical 0/1 embedding is a
/// corrupt encoding, not a "truthy" value.
fn decode_flag(element: &Fr, index: usize) -> Result<bool, CodecError> {
    if element.is_zero() {
        Ok(false)
    } else if element.is_one() {
        Ok(true)
    } else {
        Err(CodecError::OutOfRangeElement { index })
    }
}

fn decode_uint(element: &Fr, index: usize) -> Result<Uint64, CodecError> {
    Uint64::from_field(element).map_err(|_| CodecError::OutOfRangeElement { index })
}

fn decode_int(element: &Fr, index: usize) -> Result<Int64, CodecError> {
    Int64::from_field(element).map_err(|_| CodecError::OutOfRangeElement { index })
}

impl AccountStatement {
    /// Serializes the statement into its canonical element sequence.
    ///
    /// Pure and total: every statement encodes, and equal statements
    /// encode to element-wise equal sequences.
    pub fn serialize(&self) -> Vec<Fr> {
        let mut out =
            Vec::with_capacity(STATEMENT_HEADER_WIDTH + self.transactions.len() * TX_RECORD_WIDTH);

        out.push(self.account_id);
        out.push(self.closing_balance.to_field());
        out.push(self.period_start.to_field());
        out.push(self.period_end.to_field());
        out.push(self.issued_at.to_field());

        for tx in &self.transactions {
            out.push(tx.id);
            out.push(tx.amount.to_field());
            for bit in tx.class.bits() {
                out.push(Fr::from(bit as u64));
            }
            out.push(tx.timestamp.to_field());
        }

        out
    }

    /// Decodes a canonical element sequence back into a statement.
    ///
    /// Exact left inverse of [`serialize`](Self::serialize): for every
    /// valid statement `s`, `deserialize(&s.serialize()) == Ok(s)`.
    ///
    /// # Errors
    ///
    /// [`CodecError::MalformedEncoding`] when the length does not match
    /// the fixed per-record width; [`CodecError::OutOfRangeElement`] when
    /// an integer or flag slot holds an element outside its range.
    pub fn deserialize(elements: &[Fr]) -> Result<Self, CodecError> {
        let len = elements.len();
        if len < STATEMENT_HEADER_WIDTH || (len - STATEMENT_HEADER_WIDTH) % TX_RECORD_WIDTH != 0 {
            return Err(CodecError::MalformedEncoding { len });
        }

        let account_id = elements[0];
        let closing_balance = decode_uint(&elements[1], 1)?;
        let period_start = decode_uint(&elements[2], 2)?;
        let period_end = decode_uint(&elements[3], 3)?;
        let issued_at = decode_uint(&elements[4], 4)?;

        let count = (len - STATEMENT_HEADER_WIDTH) / TX_RECORD_WIDTH;
        let mut transactions = Vec::with_capacity(count);
        for record in elements[STATEMENT_HEADER_WIDTH..].chunks_exact(TX_RECORD_WIDTH) {
            let base = STATEMENT_HEADER_WIDTH + transactions.len() * TX_RECORD_WIDTH;
            transactions.push(Transaction {
                id: record[0],
                amount: decode_int(&record[1], base + 1)?,
                class: TransactionClass::new(
                    decode_flag(&record[2], base + 2)?,
                    decode_flag(&record[3], base + 3)?,
                    decode_flag(&record[4], base + 4)?,
                    decode_flag(&record[5], base + 5)?,
                ),
                timestamp: decode_uint(&record[6], base + 6)?,
            });
        }

        Ok(Self {
            account_id,
            closing_balance,
            period_start,
            period_end,
            issued_at,
            transactions,
        })
    }

    /// The statement's content hash: the domain hash of its canonical
    /// encoding. Two statements are equal iff their content hashes are
    /// (modulo BLAKE3 collisions, which you will not find).
    pub fn content_hash(&self) -> [u8; 32] {
        hash_elements(STATEMENT_HASH_CONTEXT, &self.serialize())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
