//! Split allocation for new expenses.
//!
//! Turns a caller-supplied share list into concrete [`Split`]s whose
//! amounts sum to the expense total **exactly**. This runs before anything
//! touches the database; a bad share list blocks expense creation
//! entirely.

use crate::{EngineError, ResultEngine, Split, SplitMethod};

/// Basis points in a whole (100%).
const PERCENT_SCALE_BP: i64 = 10_000;
/// Accepted drift on the percent sum, mirroring ±0.1% on user input.
const PERCENT_TOLERANCE_BP: i64 = 10;

/// One member's requested share of a new expense.
///
/// Which field is read depends on the split method: `equal` ignores both,
/// `exact` requires `amount_minor`, `percent` requires `percent_bp`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareSpec {
    pub user_id: String,
    pub amount_minor: Option<i64>,
    pub percent_bp: Option<i64>,
}

/// Allocate `amount_minor` among `shares` according to `method`.
pub(crate) fn allocate_shares(
    method: SplitMethod,
    amount_minor: i64,
    shares: &[ShareSpec],
) -> ResultEngine<Vec<Split>> {
    if shares.is_empty() {
        return Err(EngineError::InvalidSplit(
            "at least one share is required".to_string(),
        ));
    }
    for (idx, share) in shares.iter().enumerate() {
        if shares[..idx].iter().any(|s| s.user_id == share.user_id) {
            return Err(EngineError::InvalidSplit(format!(
                "duplicate member in shares: {}",
                share.user_id
            )));
        }
    }

    match method {
        SplitMethod::Equal => Ok(allocate_equal(amount_minor, shares)),
        SplitMethod::Exact => allocate_exact(amount_minor, shares),
        SplitMethod::Percent => allocate_percent(amount_minor, shares),
    }
}

fn allocate_equal(amount_minor: i64, shares: &[ShareSpec]) -> Vec<Split> {
    let n = shares.len() as i64;
    let base = amount_minor / n;
    let remainder = amount_minor % n;

    // The first `remainder` members (input order) carry one extra cent.
    shares
        .iter()
        .enumerate()
        .map(|(idx, share)| Split {
            user_id: share.user_id.clone(),
            amount_minor: base + i64::from((idx as i64) < remainder),
        })
        .collect()
}

fn allocate_exact(amount_minor: i64, shares: &[ShareSpec]) -> ResultEngine<Vec<Split>> {
    let mut splits = Vec::with_capacity(shares.len());
    let mut total = 0i64;
    for share in shares {
        let share_minor = share.amount_minor.ok_or_else(|| {
            EngineError::InvalidSplit(format!("missing amount for member {}", share.user_id))
        })?;
        if share_minor < 0 {
            return Err(EngineError::InvalidSplit(format!(
                "negative share for member {}",
                share.user_id
            )));
        }
        total += share_minor;
        splits.push(Split {
            user_id: share.user_id.clone(),
            amount_minor: share_minor,
        });
    }

    // Integer cents leave no room for rounding noise: the sum must match.
    if total != amount_minor {
        return Err(EngineError::InvalidSplit(format!(
            "split amounts sum ({total}) does not match total ({amount_minor})"
        )));
    }
    Ok(splits)
}

fn allocate_percent(amount_minor: i64, shares: &[ShareSpec]) -> ResultEngine<Vec<Split>> {
    let mut total_bp = 0i64;
    for share in shares {
        let bp = share.percent_bp.ok_or_else(|| {
            EngineError::InvalidSplit(format!("missing percent for member {}", share.user_id))
        })?;
        if bp < 0 {
            return Err(EngineError::InvalidSplit(format!(
                "negative percent for member {}",
                share.user_id
            )));
        }
        total_bp += bp;
    }
    if (total_bp - PERCENT_SCALE_BP).abs() > PERCENT_TOLERANCE_BP {
        return Err(EngineError::InvalidSplit(format!(
            "percentages sum to {total_bp} bp, expected {PERCENT_SCALE_BP}"
        )));
    }

    // Largest-remainder allocation over the given weights so the cents sum
    // to the total exactly regardless of the bp drift.
    let mut splits: Vec<Split> = Vec::with_capacity(shares.len());
    let mut remainders: Vec<(i64, usize)> = Vec::with_capacity(shares.len());
    let mut allocated = 0i64;
    for (idx, share) in shares.iter().enumerate() {
        let bp = share.percent_bp.unwrap_or(0);
        let exact = amount_minor * bp;
        let floor = exact / total_bp;
        remainders.push((exact % total_bp, idx));
        allocated += floor;
        splits.push(Split {
            user_id: share.user_id.clone(),
            amount_minor: floor,
        });
    }

    let mut leftover = amount_minor - allocated;
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, idx) in remainders {
        if leftover == 0 {
            break;
        }
        splits[idx].amount_minor += 1;
        leftover -= 1;
    }

    Ok(splits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(user: &str) -> ShareSpec {
        ShareSpec {
            user_id: user.to_string(),
            amount_minor: None,
            percent_bp: None,
        }
    }

    fn exact(user: &str, amount_minor: i64) -> ShareSpec {
        ShareSpec {
            amount_minor: Some(amount_minor),
            ..share(user)
        }
    }

    fn percent(user: &str, bp: i64) -> ShareSpec {
        ShareSpec {
            percent_bp: Some(bp),
            ..share(user)
        }
    }

    fn total(splits: &[Split]) -> i64 {
        splits.iter().map(|s| s.amount_minor).sum()
    }

    #[test]
    fn equal_distributes_remainder_cents_in_order() {
        let splits =
            allocate_shares(SplitMethod::Equal, 100, &[share("a"), share("b"), share("c")])
                .unwrap();
        assert_eq!(
            splits.iter().map(|s| s.amount_minor).collect::<Vec<_>>(),
            vec![34, 33, 33]
        );
        assert_eq!(total(&splits), 100);
    }

    #[test]
    fn equal_two_way() {
        let splits = allocate_shares(SplitMethod::Equal, 10_000, &[share("a"), share("b")])
            .unwrap();
        assert_eq!(splits[0].amount_minor, 5_000);
        assert_eq!(splits[1].amount_minor, 5_000);
    }

    #[test]
    fn exact_requires_matching_sum() {
        let err = allocate_shares(SplitMethod::Exact, 100, &[exact("a", 60), exact("b", 41)])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSplit(_)));

        let splits =
            allocate_shares(SplitMethod::Exact, 100, &[exact("a", 60), exact("b", 40)]).unwrap();
        assert_eq!(total(&splits), 100);
    }

    #[test]
    fn exact_rejects_missing_and_negative_amounts() {
        assert!(allocate_shares(SplitMethod::Exact, 100, &[share("a")]).is_err());
        assert!(
            allocate_shares(SplitMethod::Exact, 100, &[exact("a", 150), exact("b", -50)]).is_err()
        );
    }

    #[test]
    fn percent_allocates_exactly_despite_rounding() {
        // Thirds of 1.00: floors give 33/33/33, largest remainders get the
        // leftover cent.
        let splits = allocate_shares(
            SplitMethod::Percent,
            100,
            &[percent("a", 3_334), percent("b", 3_333), percent("c", 3_333)],
        )
        .unwrap();
        assert_eq!(total(&splits), 100);
        assert_eq!(splits[0].amount_minor, 34);
    }

    #[test]
    fn percent_rejects_bad_sum() {
        let err = allocate_shares(
            SplitMethod::Percent,
            100,
            &[percent("a", 5_000), percent("b", 4_000)],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSplit(_)));
    }

    #[test]
    fn percent_tolerates_small_drift() {
        // 49.97% + 50.00% is inside the ±10 bp window; the allocation still
        // hands out every cent.
        let splits = allocate_shares(
            SplitMethod::Percent,
            101,
            &[percent("a", 4_997), percent("b", 5_000)],
        )
        .unwrap();
        assert_eq!(total(&splits), 101);
    }

    #[test]
    fn duplicate_members_rejected() {
        let err = allocate_shares(SplitMethod::Equal, 100, &[share("a"), share("a")])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSplit(_)));
    }

    #[test]
    fn empty_shares_rejected() {
        assert!(allocate_shares(SplitMethod::Equal, 100, &[]).is_err());
    }
}
