//! Net flow aggregation.
//!
//! Folds a group's ledger (non-archived expenses plus settlements) into one
//! signed position per member: positive means the member is owed money,
//! negative means they owe. The map is built fresh per invocation and
//! discarded on return.
//!
//! Every credit entry is offset by equal debits, so the values always sum
//! to zero for a well-formed ledger. The simplifier re-checks that
//! invariant and refuses to produce output when it does not hold.

use std::collections::HashMap;

use crate::{Expense, Settlement};

/// Compute each member's signed net position in minor units.
///
/// Expenses must carry their splits. Summation order is irrelevant; only
/// additions are performed.
pub fn net_flows(expenses: &[Expense], settlements: &[Settlement]) -> HashMap<String, i64> {
    let mut net: HashMap<String, i64> = HashMap::new();

    for expense in expenses {
        // The payer fronted the full amount.
        *net.entry(expense.payer_id.clone()).or_default() += expense.amount_minor;
        // Each split member consumed their share.
        for split in &expense.splits {
            *net.entry(split.user_id.clone()).or_default() -= split.amount_minor;
        }
    }

    for settlement in settlements {
        // Paying down a debt raises the payer's net and lowers the payee's.
        *net.entry(settlement.payer_id.clone()).or_default() += settlement.amount_minor;
        *net.entry(settlement.payee_id.clone()).or_default() -= settlement.amount_minor;
    }

    net
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Split, SplitMethod};
    use uuid::Uuid;

    fn expense(payer: &str, amount_minor: i64, splits: &[(&str, i64)]) -> Expense {
        let mut expense = Expense::new(
            Uuid::new_v4(),
            payer.to_string(),
            amount_minor,
            "test".to_string(),
            SplitMethod::Exact,
            payer.to_string(),
        )
        .unwrap();
        expense.splits = splits
            .iter()
            .map(|(user, amount)| Split {
                user_id: (*user).to_string(),
                amount_minor: *amount,
            })
            .collect();
        expense
    }

    fn settlement(payer: &str, payee: &str, amount_minor: i64) -> Settlement {
        Settlement::new(
            Uuid::new_v4(),
            payer.to_string(),
            payee.to_string(),
            amount_minor,
        )
        .unwrap()
    }

    #[test]
    fn empty_ledger_yields_empty_map() {
        assert!(net_flows(&[], &[]).is_empty());
    }

    #[test]
    fn payer_is_credited_and_splitters_debited() {
        let net = net_flows(&[expense("a", 100, &[("a", 50), ("b", 50)])], &[]);
        assert_eq!(net["a"], 50);
        assert_eq!(net["b"], -50);
    }

    #[test]
    fn settlement_moves_net_from_payee_to_payer() {
        let net = net_flows(
            &[expense("a", 100, &[("a", 50), ("b", 50)])],
            &[settlement("b", "a", 30)],
        );
        assert_eq!(net["a"], 20);
        assert_eq!(net["b"], -20);
    }

    #[test]
    fn net_flows_conserve_to_zero() {
        let net = net_flows(
            &[
                expense("a", 100, &[("b", 60), ("c", 40)]),
                expense("b", 75, &[("a", 25), ("b", 25), ("c", 25)]),
            ],
            &[settlement("c", "a", 10)],
        );
        assert_eq!(net.values().sum::<i64>(), 0);
    }
}
