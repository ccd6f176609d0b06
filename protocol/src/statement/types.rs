//! Core type definitions for account statements.
//!
//! These are the value objects the whole protocol operates on. All of
//! them are immutable after construction: the authority builds a
//! statement once, signs it, and every later computation derives new
//! values instead of mutating shared state.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::num::{Int64, Uint64};

// ---------------------------------------------------------------------------
// TransactionClass
// ---------------------------------------------------------------------------

/// Selector for one of the four classification flags.
///
/// Which flag means what is a policy decision made by the issuing
/// authority — the protocol only guarantees there are four independent
/// bits and carries them faithfully through the codec. The names here
/// are the conventional reading, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassFlag {
    /// Funds arriving at the account (salary, transfers in).
    Incoming,
    /// Funds leaving the account.
    Outgoing,
    /// Bank fees and service charges.
    Fee,
    /// Anything the issuer didn't fit into the other three buckets.
    Other,
}

impl fmt::Display for ClassFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => write!(f, "Incoming"),
            Self::Outgoing => write!(f, "Outgoing"),
            Self::Fee => write!(f, "Fee"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Category membership bits for one transaction.
///
/// The four flags are independent — a transaction can carry several at
/// once (an outgoing fee, say) or none at all. They are *not* an enum
/// discriminant. Equality is structural: all four bits equal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
pub struct TransactionClass {
    pub incoming: bool,
    pub outgoing: bool,
    pub fee: bool,
    pub other: bool,
}

impl TransactionClass {
    pub fn new(incoming: bool, outgoing: bool, fee: bool, other: bool) -> Self {
        Self {
            incoming,
            outgoing,
            fee,
            other,
        }
    }

    /// A class with exactly one flag set. Covers the common case where
    /// the issuer's categories are mutually exclusive in practice.
    pub fn only(flag: ClassFlag) -> Self {
        let mut class = Self::default();
        match flag {
            ClassFlag::Incoming => class.incoming = true,
            ClassFlag::Outgoing => class.outgoing = true,
            ClassFlag::Fee => class.fee = true,
            ClassFlag::Other => class.other = true,
        }
        class
    }

    /// Whether the given flag is set.
    pub fn has(&self, flag: ClassFlag) -> bool {
        match flag {
            ClassFlag::Incoming => self.incoming,
            ClassFlag::Outgoing => self.outgoing,
            ClassFlag::Fee => self.fee,
            ClassFlag::Other => self.other,
        }
    }

    /// The flags in canonical encoding order.
    pub fn bits(&self) -> [bool; 4] {
        [self.incoming, self.outgoing, self.fee, self.other]
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A single ledger entry in a statement.
///
/// `amount` is signed — negative is a debit, positive a credit — in the
/// ledger's smallest denomination. `id` is a field element so issuers can
/// carry opaque identifiers (or [`hash_to_field`](crate::crypto::hash_to_field)
/// digests of external references) without the codec caring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Issuer-assigned identifier.
    pub id: Fr,
    /// Signed amount in the smallest denomination.
    pub amount: Int64,
    /// Category membership bits.
    pub class: TransactionClass,
    /// Unix timestamp in seconds.
    pub timestamp: Uint64,
}

impl Transaction {
    pub fn new(id: Fr, amount: Int64, class: TransactionClass, timestamp: Uint64) -> Self {
        Self {
            id,
            amount,
            class,
            timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// AccountStatement
// ---------------------------------------------------------------------------

/// A customer's account statement as issued by the authority.
///
/// `closing_balance` is the balance *as of the last transaction in the
/// list* — historical balances are reconstructed backwards by subtracting
/// later amounts (see [`balance_after_tx`](AccountStatement::balance_after_tx)),
/// never accumulated forward from an opening balance.
///
/// Invariant: `transactions` is ordered by occurrence, earliest first.
/// The codec and the aggregation engine both assume this order and do not
/// re-sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatement {
    /// Issuer-assigned account identifier.
    pub account_id: Fr,
    /// Balance immediately after the last listed transaction.
    pub closing_balance: Uint64,
    /// Start of the reporting period (Unix seconds).
    pub period_start: Uint64,
    /// End of the reporting period (Unix seconds).
    pub period_end: Uint64,
    /// When the authority issued this statement (Unix seconds).
    pub issued_at: Uint64,
    /// Ledger entries, earliest first. Exclusively owned — no entry holds
    /// a back-reference to its statement.
    pub transactions: Vec<Transaction>,
}

impl AccountStatement {
    pub fn new(
        account_id: Fr,
        closing_balance: Uint64,
        period_start: Uint64,
        period_end: Uint64,
        issued_at: Uint64,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            account_id,
            closing_balance,
            period_start,
            period_end,
            issued_at,
            transactions,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
