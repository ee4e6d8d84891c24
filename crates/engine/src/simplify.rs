//! Greedy debt simplification.
//!
//! Takes the net-flow map and produces a compact set of pairwise debts:
//! members are partitioned into creditors and debtors, both sides are
//! sorted by descending magnitude, and a two-pointer walk repeatedly
//! matches the largest remaining creditor against the largest remaining
//! debtor. The result is at most `members - 1` edges; it is not guaranteed
//! minimum-cardinality, but it is always correct.
//!
//! Ties between equal magnitudes are broken by member id ascending so the
//! output is deterministic for equivalent inputs.

use std::collections::HashMap;

use crate::{DebtEdge, EngineError, ResultEngine};

/// Positions with |net| below this many minor units count as settled. One
/// cent, the spec's 0.01 dust threshold in integer form.
pub const DUST_MINOR: i64 = 1;

struct Position {
    user_id: String,
    remaining: i64,
}

/// Reduce net positions to pairwise `(lender, borrower, amount)` edges.
///
/// Fails with [`EngineError::LedgerImbalance`] when credit and debt do not
/// cancel out; callers must treat that as fatal and abort the enclosing
/// transaction rather than persist approximate balances.
pub fn simplify(net: &HashMap<String, i64>) -> ResultEngine<Vec<DebtEdge>> {
    let mut creditors: Vec<Position> = Vec::new();
    let mut debtors: Vec<Position> = Vec::new();

    for (user_id, &amount) in net {
        if amount.abs() < DUST_MINOR {
            continue;
        }
        let position = Position {
            user_id: user_id.clone(),
            remaining: amount.abs(),
        };
        if amount > 0 {
            creditors.push(position);
        } else {
            debtors.push(position);
        }
    }

    let credit_total: i64 = creditors.iter().map(|p| p.remaining).sum();
    let debt_total: i64 = debtors.iter().map(|p| p.remaining).sum();
    if credit_total != debt_total {
        return Err(EngineError::LedgerImbalance(format!(
            "credit {credit_total} != debt {debt_total}"
        )));
    }

    // Largest magnitude first; member id breaks ties deterministically.
    let by_magnitude = |a: &Position, b: &Position| {
        b.remaining
            .cmp(&a.remaining)
            .then_with(|| a.user_id.cmp(&b.user_id))
    };
    creditors.sort_by(by_magnitude);
    debtors.sort_by(by_magnitude);

    let mut edges = Vec::new();
    let mut i = 0; // debtor index
    let mut j = 0; // creditor index

    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].remaining.min(creditors[j].remaining);

        if amount >= DUST_MINOR {
            edges.push(DebtEdge {
                lender_id: creditors[j].user_id.clone(),
                borrower_id: debtors[i].user_id.clone(),
                amount_minor: amount,
            });
        }

        debtors[i].remaining -= amount;
        creditors[j].remaining -= amount;

        if debtors[i].remaining < DUST_MINOR {
            i += 1;
        }
        if creditors[j].remaining < DUST_MINOR {
            j += 1;
        }
    }

    // Conservation guarantees both lists exhaust together.
    if i < debtors.len() || j < creditors.len() {
        return Err(EngineError::LedgerImbalance(
            "unmatched positions after greedy walk".to_string(),
        ));
    }

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(entries: &[(&str, i64)]) -> HashMap<String, i64> {
        entries
            .iter()
            .map(|(user, amount)| ((*user).to_string(), *amount))
            .collect()
    }

    #[test]
    fn single_debt_produces_one_edge() {
        let edges = simplify(&net(&[("a", 50), ("b", -50)])).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].lender_id, "a");
        assert_eq!(edges[0].borrower_id, "b");
        assert_eq!(edges[0].amount_minor, 50);
    }

    #[test]
    fn settled_members_yield_no_edges() {
        let edges = simplify(&net(&[("a", 0), ("b", 0), ("c", 0)])).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn chain_collapses_through_settled_middleman() {
        // A owes B, B owes C; B nets to zero and drops out.
        let edges = simplify(&net(&[("a", -50), ("b", 0), ("c", 50)])).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].lender_id, "c");
        assert_eq!(edges[0].borrower_id, "a");
        assert_eq!(edges[0].amount_minor, 50);
    }

    #[test]
    fn one_creditor_absorbs_many_debtors() {
        let edges = simplify(&net(&[("a", 100), ("b", -60), ("c", -40)])).unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.lender_id == "a"));
        assert_eq!(edges.iter().map(|e| e.amount_minor).sum::<i64>(), 100);
    }

    #[test]
    fn edge_count_is_bounded_by_members_minus_one() {
        let edges = simplify(&net(&[
            ("a", 300),
            ("b", 100),
            ("c", -150),
            ("d", -150),
            ("e", -100),
        ]))
        .unwrap();
        assert!(edges.len() <= 4);
        assert!(edges.iter().all(|e| e.amount_minor > 0));
        assert!(edges.iter().all(|e| e.lender_id != e.borrower_id));
    }

    #[test]
    fn equal_magnitudes_break_ties_by_member_id() {
        let first = simplify(&net(&[("b", 50), ("a", 50), ("d", -50), ("c", -50)])).unwrap();
        let second = simplify(&net(&[("a", 50), ("c", -50), ("b", 50), ("d", -50)])).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].lender_id, "a");
        assert_eq!(first[0].borrower_id, "c");
    }

    #[test]
    fn imbalanced_input_fails_loudly() {
        let err = simplify(&net(&[("a", 50), ("b", -30)])).unwrap_err();
        assert!(matches!(err, EngineError::LedgerImbalance(_)));
    }
}
