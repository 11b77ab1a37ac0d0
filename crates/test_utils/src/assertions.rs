//! Custom Test Assertions
//!
//! Assertion helpers for ledger results that give more meaningful failure
//! messages than comparing whole structs.

use core_kernel::{FeeTypeId, Money};
use domain_fees::{ClassStatistics, FeeBalance, FeeError, PaymentStatus};

/// Asserts that two Money values are equal at display precision
pub fn assert_money_eq(actual: Money, expected: Money) {
    assert_eq!(
        actual.round_to_display(),
        expected.round_to_display(),
        "Money mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Finds the balance of `fee_type_id`, panicking with the available ids
pub fn balance_for(balances: &[FeeBalance], fee_type_id: FeeTypeId) -> &FeeBalance {
    balances
        .iter()
        .find(|b| b.fee_type_id == fee_type_id)
        .unwrap_or_else(|| {
            let ids: Vec<String> = balances.iter().map(|b| b.fee_type_id.to_string()).collect();
            panic!("No balance for fee type {}; have [{}]", fee_type_id, ids.join(", "))
        })
}

/// Asserts the paid amount and status of one fee type's balance
pub fn assert_balance(
    balances: &[FeeBalance],
    fee_type_id: FeeTypeId,
    paid: Money,
    status: PaymentStatus,
) {
    let balance = balance_for(balances, fee_type_id);
    assert_money_eq(balance.paid, paid);
    assert_eq!(
        balance.status, status,
        "Status mismatch for {}: actual={:?}, expected={:?}",
        balance.fee_type_name, balance.status, status
    );
}

/// Asserts that a ledger call was refused with `InvalidAmount`
pub fn assert_invalid_amount<T: std::fmt::Debug>(result: Result<T, FeeError>) {
    match result {
        Err(FeeError::InvalidAmount { .. }) => {}
        other => panic!("Expected InvalidAmount, got {:?}", other),
    }
}

/// Asserts that a ledger call was refused with `NotApplicable`
pub fn assert_not_applicable<T: std::fmt::Debug>(result: Result<T, FeeError>) {
    match result {
        Err(FeeError::NotApplicable { .. }) => {}
        other => panic!("Expected NotApplicable, got {:?}", other),
    }
}

/// Asserts that pending equals planned minus collected
pub fn assert_statistics_reconcile(statistics: &ClassStatistics) {
    assert_eq!(
        statistics.pending_amount,
        statistics.total_fees - statistics.total_collected,
        "Pending {} does not reconcile with fees {} and collected {}",
        statistics.pending_amount,
        statistics.total_fees,
        statistics.total_collected
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_eq_ignores_storage_precision() {
        let precise = Money::new(rust_decimal_macros::dec!(10.001));
        assert_money_eq(precise, Money::from_major(10));
    }

    #[test]
    #[should_panic(expected = "Expected InvalidAmount")]
    fn test_invalid_amount_rejects_success() {
        assert_invalid_amount::<()>(Ok(()));
    }
}
