//! # Aggregation Engine
//!
//! Balance reconstruction and ranged queries over a statement's
//! transaction list, plus the per-period income fold the validator uses
//! for averages.
//!
//! The central trick is that a statement stores only the *closing*
//! balance. The balance after transaction `i` is reconstructed backwards:
//!
//! ```text
//! balance_after_tx(i) = closing_balance − Σ amount[j]   for j in (i, n-1]
//! ```
//!
//! i.e. subtract every amount that happens *after* `i`. There is no
//! stated opening balance and no forward accumulation — the suffix sum is
//! the single source of truth, which keeps the reconstruction consistent
//! with the one invariant the issuer actually attests to.
//!
//! Ranged queries address transactions by 1-based *ordinals*, clamped
//! independently at each end into the valid index range. Out-of-range
//! requests degrade to the nearest valid endpoint instead of failing;
//! only direct index access ([`balance_after_tx`]) can raise
//! [`AggregateError::IndexOutOfRange`].
//!
//! [`balance_after_tx`]: AccountStatement::balance_after_tx

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::num::{Int64, Uint64};
use crate::statement::{AccountStatement, ClassFlag, Transaction, TransactionClass};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from aggregation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// Direct index access outside `[0, n-1]`. Ranged queries clamp and
    /// never raise this.
    #[error("transaction index {index} out of range for statement with {len} transactions")]
    IndexOutOfRange { index: usize, len: usize },

    /// A checked arithmetic step left the signed 64-bit domain.
    #[error("aggregate arithmetic overflowed the signed 64-bit domain")]
    Overflow,

    /// The timestamp has no calendar-month representation.
    #[error("timestamp {timestamp} cannot be mapped to a calendar period")]
    TimestampOutOfRange { timestamp: u64 },
}

// ---------------------------------------------------------------------------
// Period bucketing
// ---------------------------------------------------------------------------

/// Identifier for one income-accumulation period.
///
/// Encoded as `year * 12 + zero_based_month` of the proleptic Gregorian
/// calendar (UTC), so consecutive months are consecutive keys and the
/// number of distinct keys in a map is the number of distinct months.
pub type PeriodKey = u64;

/// Maps a transaction timestamp (Unix seconds, UTC) to its calendar-month
/// period key.
///
/// Calendar months — not fixed 30-day windows — so a statement spanning a
/// year boundary buckets December and January separately, the way a human
/// reads "average monthly income".
pub fn period_key(timestamp: Uint64) -> Result<PeriodKey, AggregateError> {
    let out_of_range = AggregateError::TimestampOutOfRange {
        timestamp: timestamp.get(),
    };
    let secs = i64::try_from(timestamp.get()).map_err(|_| out_of_range)?;
    let datetime = DateTime::from_timestamp(secs, 0).ok_or(out_of_range)?;
    Ok(datetime.year() as u64 * 12 + datetime.month0() as u64)
}

// ---------------------------------------------------------------------------
// Income classification policy
// ---------------------------------------------------------------------------

/// Which classification flag marks a transaction as income.
///
/// The four class bits carry issuer-defined semantics, so the income
/// bit is a policy parameter rather than a hardcoded position. The
/// default reads the `incoming` flag, which is what every issuer we have
/// seen so far means by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomePolicy {
    /// The flag whose presence makes a transaction count as income.
    pub income_flag: ClassFlag,
}

impl Default for IncomePolicy {
    fn default() -> Self {
        Self {
            income_flag: ClassFlag::Incoming,
        }
    }
}

impl IncomePolicy {
    pub fn new(income_flag: ClassFlag) -> Self {
        Self { income_flag }
    }

    /// Whether the policy classifies this transaction class as income.
    pub fn is_income(&self, class: &TransactionClass) -> bool {
        class.has(self.income_flag)
    }
}

// ---------------------------------------------------------------------------
// Income fold
// ---------------------------------------------------------------------------

/// One step of the income accumulation fold.
///
/// If `policy` classifies `tx` as income, adds its amount (checked) to
/// both the running total and the accumulator for `period`; otherwise
/// both pass through unchanged. The map is taken and returned by value —
/// the fold threads an explicit accumulator instead of mutating shared
/// state, so a partial fold never leaves corrupted state behind.
pub fn update_income(
    running_total: Int64,
    period: PeriodKey,
    mut periods: BTreeMap<PeriodKey, Int64>,
    tx: &Transaction,
    policy: IncomePolicy,
) -> Result<(Int64, BTreeMap<PeriodKey, Int64>), AggregateError> {
    if !policy.is_income(&tx.class) {
        return Ok((running_total, periods));
    }

    let total = running_total
        .checked_add(tx.amount)
        .ok_or(AggregateError::Overflow)?;
    let slot = periods.entry(period).or_insert(Int64::ZERO);
    *slot = slot.checked_add(tx.amount).ok_or(AggregateError::Overflow)?;

    Ok((total, periods))
}

// ---------------------------------------------------------------------------
// Ranged queries
// ---------------------------------------------------------------------------

impl AccountStatement {
    /// The reconstructed balance immediately after transaction `index`.
    ///
    /// `balance_after_tx(n-1)` equals the closing balance by
    /// construction; each earlier balance subtracts one more amount.
    ///
    /// # Errors
    ///
    /// [`AggregateError::IndexOutOfRange`] for `index >= n`;
    /// [`AggregateError::Overflow`] if the suffix sum leaves the signed
    /// 64-bit domain.
    pub fn balance_after_tx(&self, index: usize) -> Result<Int64, AggregateError> {
        let len = self.transactions.len();
        if index >= len {
            return Err(AggregateError::IndexOutOfRange { index, len });
        }
        let mut balance =
            i64::try_from(self.closing_balance.get()).map_err(|_| AggregateError::Overflow)?;
        for tx in &self.transactions[index + 1..] {
            balance = balance
                .checked_sub(tx.amount.get())
                .ok_or(AggregateError::Overflow)?;
        }
        Ok(Int64::new(balance))
    }

    /// Clamps a 1-based ordinal into a valid array index. Ordinal 0
    /// saturates to the first transaction, anything past the end to the
    /// last. Requires a non-empty statement.
    fn clamp_ordinal(&self, ordinal: u64) -> usize {
        let last = self.transactions.len() - 1;
        usize::try_from(ordinal.saturating_sub(1)).map_or(last, |index| index.min(last))
    }

    /// The discrete integral of the balance trajectory over the ordinal
    /// window `[from, to]`: the sum of `balance_after_tx(k)` for every
    /// clamped index `k` in range.
    ///
    /// Both ordinals clamp independently; an inverted window (or an
    /// empty statement) sums to zero.
    pub fn balance_integral(&self, from: u64, to: u64) -> Result<Int64, AggregateError> {
        if self.transactions.is_empty() {
            return Ok(Int64::ZERO);
        }
        let lo = self.clamp_ordinal(from);
        let hi = self.clamp_ordinal(to);
        if hi < lo {
            return Ok(Int64::ZERO);
        }

        // Single backward pass: walk from the last transaction down to
        // `lo`, keeping the running balance, and accumulate it while the
        // cursor is inside [lo, hi]. O(n) instead of O(n * window).
        let mut balance =
            i64::try_from(self.closing_balance.get()).map_err(|_| AggregateError::Overflow)?;
        let mut sum: i64 = 0;
        for k in (lo..self.transactions.len()).rev() {
            if k <= hi {
                sum = sum.checked_add(balance).ok_or(AggregateError::Overflow)?;
            }
            if k > lo {
                balance = balance
                    .checked_sub(self.transactions[k].amount.get())
                    .ok_or(AggregateError::Overflow)?;
            }
        }
        Ok(Int64::new(sum))
    }

    /// The number of transactions addressed by the ordinal window
    /// `[from, to]` after clamping: `hi - lo + 1`, or zero for an
    /// inverted window or an empty statement.
    pub fn tx_count(&self, from: u64, to: u64) -> u64 {
        if self.transactions.is_empty() {
            return 0;
        }
        let lo = self.clamp_ordinal(from);
        let hi = self.clamp_ordinal(to);
        if hi >= lo {
            (hi - lo) as u64 + 1
        } else {
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
