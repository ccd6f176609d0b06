//! # Compliance Validator
//!
//! The validator is where a [`TransactionalProof`] — one statement paired
//! with the predicates it must satisfy — is actually checked. The state
//! machine is deliberately small:
//!
//! 1. **Authenticate** — verify the authority signature over the
//!    statement's canonical encoding. A forged or stale statement stops
//!    here; no predicate ever runs against unauthenticated data.
//! 2. **Evaluate** — for each [`RequiredProof`] in declared order,
//!    compute the aggregate and assert it lies within the declared
//!    bounds, inclusive.
//! 3. **Accept** — nothing left to say; `Ok(())`.
//!
//! Failure is fail-fast and all-or-nothing: the first violated predicate
//! aborts with [`ValidationError::ThresholdNotMet`] naming the offender,
//! and later predicates are never evaluated. There is no boolean to
//! silently absorb — a caller must look at the typed error to learn
//! whether authentication, arithmetic, or a threshold was at fault.
//!
//! All divisions are integer-domain. An average over zero periods or
//! zero transactions is [`ValidationError::DivisionByZero`], never a
//! quiet zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::aggregate::{period_key, update_income, AggregateError, IncomePolicy};
use crate::crypto::keys::{AuthorityPublicKey, AuthoritySignature};
use crate::num::Int64;
use crate::statement::AccountStatement;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Terminal outcomes of a failed validation.
///
/// Each variant is a distinct failure mode a caller may react to
/// differently; none of them mutates or corrupts the statement under
/// evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The authority signature does not verify. Nothing else was checked.
    #[error("statement authentication failed: signature does not verify under the authority key")]
    AuthenticationFailed,

    /// A required proof's computed aggregate fell outside its bounds.
    #[error(
        "required proof {index} ({kind}) not met: computed {computed}, \
         required [{lower_bound}, {upper_bound}]"
    )]
    ThresholdNotMet {
        /// Position of the offending proof in the declared list.
        index: usize,
        kind: RequiredProofKind,
        computed: Int64,
        lower_bound: Int64,
        upper_bound: Int64,
    },

    /// An average was requested over zero periods or zero transactions.
    #[error("division by zero computing {quantity}")]
    DivisionByZero { quantity: &'static str },

    /// A required-proof list must contain at least one proof.
    #[error("required proof list is empty")]
    NoProofsRequested,

    /// An aggregation query failed (index or arithmetic).
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

// ---------------------------------------------------------------------------
// Required proofs
// ---------------------------------------------------------------------------

/// The kinds of compliance predicate an authority can be asked to attest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredProofKind {
    /// Average income per distinct calendar month, over the full
    /// statement.
    AvgMonthlyIncome,
    /// Mean reconstructed balance over the full transaction range.
    AvgMonthlyBalance,
}

impl fmt::Display for RequiredProofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AvgMonthlyIncome => write!(f, "AvgMonthlyIncome"),
            Self::AvgMonthlyBalance => write!(f, "AvgMonthlyBalance"),
        }
    }
}

/// One declared compliance predicate: a kind plus an inclusive bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredProof {
    pub kind: RequiredProofKind,
    /// Inclusive lower bound on the computed aggregate.
    pub lower_bound: Int64,
    /// Inclusive upper bound on the computed aggregate.
    pub upper_bound: Int64,
}

impl RequiredProof {
    pub fn new(kind: RequiredProofKind, lower_bound: Int64, upper_bound: Int64) -> Self {
        Self {
            kind,
            lower_bound,
            upper_bound,
        }
    }

    /// Whether `value` satisfies the bound, both ends inclusive.
    fn contains(&self, value: Int64) -> bool {
        self.lower_bound <= value && value <= self.upper_bound
    }
}

/// An ordered, non-empty list of required proofs. Evaluation order is the
/// declaration order, and the first failure wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredProofs(Vec<RequiredProof>);

impl RequiredProofs {
    /// Wraps a proof list, rejecting the degenerate empty case: a
    /// validation that checks nothing attests to nothing.
    pub fn new(proofs: Vec<RequiredProof>) -> Result<Self, ValidationError> {
        if proofs.is_empty() {
            return Err(ValidationError::NoProofsRequested);
        }
        Ok(Self(proofs))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequiredProof> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        // Constructor rejects empty lists, but the accessor pair keeps
        // clippy and callers honest.
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TransactionalProof
// ---------------------------------------------------------------------------

/// The unit of validation: one authenticated statement paired with the
/// predicates it must satisfy.
///
/// Holds its statement by value — validations are independent of each
/// other, share nothing, and can run on as many threads as you like.
#[derive(Debug, Clone)]
pub struct TransactionalProof {
    statement: AccountStatement,
    required: RequiredProofs,
    policy: IncomePolicy,
}

impl TransactionalProof {
    /// Pairs a statement with its required proofs under the default
    /// income policy.
    pub fn new(statement: AccountStatement, required: RequiredProofs) -> Self {
        Self {
            statement,
            required,
            policy: IncomePolicy::default(),
        }
    }

    /// Same, with an explicit income-classification policy.
    pub fn with_policy(
        statement: AccountStatement,
        required: RequiredProofs,
        policy: IncomePolicy,
    ) -> Self {
        Self {
            statement,
            required,
            policy,
        }
    }

    pub fn statement(&self) -> &AccountStatement {
        &self.statement
    }

    pub fn required(&self) -> &RequiredProofs {
        &self.required
    }

    /// Runs the full validation state machine.
    ///
    /// # Errors
    ///
    /// [`ValidationError::AuthenticationFailed`] if the signature does
    /// not verify (terminal, no predicates run);
    /// [`ValidationError::ThresholdNotMet`] on the first predicate whose
    /// computed aggregate falls outside its bounds;
    /// [`ValidationError::DivisionByZero`] /
    /// [`ValidationError::Aggregate`] if an average is undefined or an
    /// aggregation query fails.
    pub fn validate(
        &self,
        authority: &AuthorityPublicKey,
        signature: &AuthoritySignature,
    ) -> Result<(), ValidationError> {
        if !self.statement.verify_signature(authority, signature) {
            return Err(ValidationError::AuthenticationFailed);
        }
        debug!(
            transactions = self.statement.transactions.len(),
            proofs = self.required.len(),
            "statement authenticated, evaluating required proofs"
        );

        for (index, proof) in self.required.iter().enumerate() {
            let computed = match proof.kind {
                RequiredProofKind::AvgMonthlyIncome => self.average_monthly_income()?,
                RequiredProofKind::AvgMonthlyBalance => self.average_balance()?,
            };
            trace!(
                index,
                kind = %proof.kind,
                computed = %computed,
                lower = %proof.lower_bound,
                upper = %proof.upper_bound,
                "evaluated required proof"
            );
            if !proof.contains(computed) {
                return Err(ValidationError::ThresholdNotMet {
                    index,
                    kind: proof.kind,
                    computed,
                    lower_bound: proof.lower_bound,
                    upper_bound: proof.upper_bound,
                });
            }
        }

        Ok(())
    }

    /// Total income divided by the number of distinct calendar months
    /// that saw any — a per-period average, not a per-transaction one.
    fn average_monthly_income(&self) -> Result<Int64, ValidationError> {
        let mut total = Int64::ZERO;
        let mut periods = BTreeMap::new();
        for tx in &self.statement.transactions {
            let period = period_key(tx.timestamp)?;
            (total, periods) = update_income(total, period, periods, tx, self.policy)?;
        }

        let month_count = periods.len();
        if month_count == 0 {
            return Err(ValidationError::DivisionByZero {
                quantity: "average monthly income (no income periods observed)",
            });
        }
        total
            .checked_div(Int64::new(month_count as i64))
            .ok_or(ValidationError::Aggregate(AggregateError::Overflow))
    }

    /// Mean reconstructed balance over the full ordinal range: the
    /// balance integral divided by the transaction count.
    fn average_balance(&self) -> Result<Int64, ValidationError> {
        let n = self.statement.transactions.len() as u64;
        let count = self.statement.tx_count(1, n);
        if count == 0 {
            return Err(ValidationError::DivisionByZero {
                quantity: "average balance (statement has no transactions)",
            });
        }
        let integral = self.statement.balance_integral(1, n)?;
        integral
            .checked_div(Int64::new(count as i64))
            .ok_or(ValidationError::Aggregate(AggregateError::Overflow))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::AuthorityKeypair;
    use crate::num::Uint64;
    use crate::statement::{ClassFlag, Transaction, TransactionClass};
    use ark_bn254::Fr;

    const NOV_2023: u64 = 1_700_000_000;

    /// Three incoming credits of 1000 within a single calendar month,
    /// closing balance 5000. Average monthly income = 3000; reconstructed
    /// balances 3000/4000/5000, so average balance = 4000.
    fn sample_statement() -> AccountStatement {
        let transactions = (0..3u64)
            .map(|i| {
                Transaction::new(
                    Fr::from(i + 1),
                    Int64::new(1_000),
                    TransactionClass::only(ClassFlag::Incoming),
                    Uint64::new(NOV_2023 + i * 3_600),
                )
            })
            .collect();
        AccountStatement::new(
            Fr::from(0u64),
            Uint64::new(5_000),
            Uint64::new(NOV_2023),
            Uint64::new(NOV_2023 + 86_400),
            Uint64::new(NOV_2023 + 90_000),
            transactions,
        )
    }

    fn income_proof(lower: i64, upper: i64) -> RequiredProofs {
        RequiredProofs::new(vec![RequiredProof::new(
            RequiredProofKind::AvgMonthlyIncome,
            Int64::new(lower),
            Int64::new(upper),
        )])
        .unwrap()
    }

    fn balance_proof(lower: i64, upper: i64) -> RequiredProofs {
        RequiredProofs::new(vec![RequiredProof::new(
            RequiredProofKind::AvgMonthlyBalance,
            Int64::new(lower),
            Int64::new(upper),
        )])
        .unwrap()
    }

    fn signed(statement: &AccountStatement) -> (AuthorityKeypair, AuthoritySignature) {
        let authority = AuthorityKeypair::generate();
        let signature = statement.sign(&authority);
        (authority, signature)
    }

    #[test]
    fn sufficient_income_passes() {
        let statement = sample_statement();
        let (authority, sig) = signed(&statement);
        let proof = TransactionalProof::new(statement, income_proof(2_900, 5_000));
        assert_eq!(proof.validate(&authority.public_key(), &sig), Ok(()));
    }

    #[test]
    fn insufficient_income_fails() {
        let statement = sample_statement();
        let (authority, sig) = signed(&statement);
        let proof = TransactionalProof::new(statement, income_proof(3_001, 5_000));
        match proof.validate(&authority.public_key(), &sig) {
            Err(ValidationError::ThresholdNotMet {
                index: 0,
                kind: RequiredProofKind::AvgMonthlyIncome,
                computed,
                ..
            }) => assert_eq!(computed, Int64::new(3_000)),
            other => panic!("expected ThresholdNotMet, got {:?}", other),
        }
    }

    #[test]
    fn sufficient_balance_passes() {
        let statement = sample_statement();
        let (authority, sig) = signed(&statement);
        let proof = TransactionalProof::new(statement, balance_proof(3_500, 8_000));
        assert_eq!(proof.validate(&authority.public_key(), &sig), Ok(()));
    }

    #[test]
    fn insufficient_balance_fails() {
        let statement = sample_statement();
        let (authority, sig) = signed(&statement);
        let proof = TransactionalProof::new(statement, balance_proof(8_000, 9_000));
        match proof.validate(&authority.public_key(), &sig) {
            Err(ValidationError::ThresholdNotMet {
                kind: RequiredProofKind::AvgMonthlyBalance,
                computed,
                ..
            }) => assert_eq!(computed, Int64::new(4_000)),
            other => panic!("expected ThresholdNotMet, got {:?}", other),
        }
    }

    #[test]
    fn widened_bounds_flip_failure_to_success() {
        // The §8 threshold scenario: the same statement fails with a
        // lower bound above the true mean and passes once the window
        // actually contains it.
        let statement = sample_statement();
        let (authority, sig) = signed(&statement);

        let failing = TransactionalProof::new(statement.clone(), balance_proof(4_001, 9_000));
        assert!(matches!(
            failing.validate(&authority.public_key(), &sig),
            Err(ValidationError::ThresholdNotMet { .. })
        ));

        let passing = TransactionalProof::new(statement, balance_proof(3_999, 4_001));
        assert_eq!(passing.validate(&authority.public_key(), &sig), Ok(()));
    }

    #[test]
    fn forged_signature_short_circuits() {
        let statement = sample_statement();
        let impostor = AuthorityKeypair::generate();
        let forged = statement.sign(&impostor);
        let real_authority = AuthorityKeypair::generate();

        // The predicate is unsatisfiable, but authentication fails first.
        let proof = TransactionalProof::new(statement, income_proof(i64::MAX, i64::MAX));
        assert_eq!(
            proof.validate(&real_authority.public_key(), &forged),
            Err(ValidationError::AuthenticationFailed)
        );
    }

    #[test]
    fn tampered_statement_fails_authentication() {
        let statement = sample_statement();
        let (authority, sig) = signed(&statement);

        let mut tampered = statement;
        tampered.closing_balance = Uint64::new(50_000);
        let proof = TransactionalProof::new(tampered, balance_proof(0, i64::MAX));
        assert_eq!(
            proof.validate(&authority.public_key(), &sig),
            Err(ValidationError::AuthenticationFailed)
        );
    }

    #[test]
    fn first_failing_proof_wins() {
        let statement = sample_statement();
        let (authority, sig) = signed(&statement);

        let required = RequiredProofs::new(vec![
            RequiredProof::new(
                RequiredProofKind::AvgMonthlyBalance,
                Int64::new(9_000),
                Int64::new(9_999),
            ),
            RequiredProof::new(
                RequiredProofKind::AvgMonthlyIncome,
                Int64::new(1_000_000),
                Int64::new(2_000_000),
            ),
        ])
        .unwrap();
        let proof = TransactionalProof::new(statement, required);
        match proof.validate(&authority.public_key(), &sig) {
            Err(ValidationError::ThresholdNotMet { index: 0, kind, .. }) => {
                assert_eq!(kind, RequiredProofKind::AvgMonthlyBalance);
            }
            other => panic!("expected the first proof to fail, got {:?}", other),
        }
    }

    #[test]
    fn all_proofs_must_pass() {
        let statement = sample_statement();
        let (authority, sig) = signed(&statement);

        let required = RequiredProofs::new(vec![
            RequiredProof::new(
                RequiredProofKind::AvgMonthlyIncome,
                Int64::new(2_000),
                Int64::new(4_000),
            ),
            RequiredProof::new(
                RequiredProofKind::AvgMonthlyBalance,
                Int64::new(3_000),
                Int64::new(5_000),
            ),
        ])
        .unwrap();
        let proof = TransactionalProof::new(statement, required);
        assert_eq!(proof.validate(&authority.public_key(), &sig), Ok(()));
    }

    #[test]
    fn no_income_means_division_by_zero() {
        // Outgoing-only statement: the income fold observes zero periods.
        let transactions = vec![Transaction::new(
            Fr::from(1u64),
            Int64::new(-500),
            TransactionClass::only(ClassFlag::Outgoing),
            Uint64::new(NOV_2023),
        )];
        let statement = AccountStatement::new(
            Fr::from(0u64),
            Uint64::new(1_000),
            Uint64::new(NOV_2023),
            Uint64::new(NOV_2023),
            Uint64::new(NOV_2023),
            transactions,
        );
        let (authority, sig) = signed(&statement);
        let proof = TransactionalProof::new(statement, income_proof(0, 1_000));
        assert!(matches!(
            proof.validate(&authority.public_key(), &sig),
            Err(ValidationError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn empty_statement_balance_average_is_division_by_zero() {
        let statement = AccountStatement::new(
            Fr::from(0u64),
            Uint64::new(1_000),
            Uint64::new(NOV_2023),
            Uint64::new(NOV_2023),
            Uint64::new(NOV_2023),
            vec![],
        );
        let (authority, sig) = signed(&statement);
        let proof = TransactionalProof::new(statement, balance_proof(0, 1_000));
        assert!(matches!(
            proof.validate(&authority.public_key(), &sig),
            Err(ValidationError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn income_policy_is_configurable() {
        // Reclassify: the statement's credits carry only the `other`
        // flag, so the default policy sees no income but an `other`-based
        // policy does.
        let transactions = vec![Transaction::new(
            Fr::from(1u64),
            Int64::new(2_000),
            TransactionClass::only(ClassFlag::Other),
            Uint64::new(NOV_2023),
        )];
        let statement = AccountStatement::new(
            Fr::from(0u64),
            Uint64::new(2_000),
            Uint64::new(NOV_2023),
            Uint64::new(NOV_2023),
            Uint64::new(NOV_2023),
            transactions,
        );
        let (authority, sig) = signed(&statement);

        let default_policy =
            TransactionalProof::new(statement.clone(), income_proof(1_000, 3_000));
        assert!(matches!(
            default_policy.validate(&authority.public_key(), &sig),
            Err(ValidationError::DivisionByZero { .. })
        ));

        let other_policy = TransactionalProof::with_policy(
            statement,
            income_proof(1_000, 3_000),
            IncomePolicy::new(ClassFlag::Other),
        );
        assert_eq!(other_policy.validate(&authority.public_key(), &sig), Ok(()));
    }

    #[test]
    fn empty_proof_list_rejected_at_construction() {
        assert_eq!(
            RequiredProofs::new(vec![]).unwrap_err(),
            ValidationError::NoProofsRequested
        );
    }

    #[test]
    fn validation_does_not_mutate_the_statement() {
        let statement = sample_statement();
        let (authority, sig) = signed(&statement);
        let snapshot = statement.clone();
        let proof = TransactionalProof::new(statement, income_proof(9_999_999, 10_000_000));
        let _ = proof.validate(&authority.public_key(), &sig);
        assert_eq!(proof.statement(), &snapshot);
    }

    #[test]
    fn income_spanning_months_averages_per_period() {
        // 1000 in November, 3000 in December: average monthly income is
        // 4000 / 2 months = 2000.
        let transactions = vec![
            Transaction::new(
                Fr::from(1u64),
                Int64::new(1_000),
                TransactionClass::only(ClassFlag::Incoming),
                Uint64::new(NOV_2023),
            ),
            Transaction::new(
                Fr::from(2u64),
                Int64::new(3_000),
                TransactionClass::only(ClassFlag::Incoming),
                Uint64::new(1_701_433_000), // 2023-12-01
            ),
        ];
        let statement = AccountStatement::new(
            Fr::from(0u64),
            Uint64::new(4_000),
            Uint64::new(NOV_2023),
            Uint64::new(1_701_433_000),
            Uint64::new(1_701_500_000),
            transactions,
        );
        let (authority, sig) = signed(&statement);

        let passing = TransactionalProof::new(statement.clone(), income_proof(2_000, 2_000));
        assert_eq!(passing.validate(&authority.public_key(), &sig), Ok(()));

        let failing = TransactionalProof::new(statement, income_proof(2_001, 9_000));
        assert!(matches!(
            failing.validate(&authority.public_key(), &sig),
            Err(ValidationError::ThresholdNotMet { .. })
        ));
    }
}
