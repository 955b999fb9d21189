//! Largest-remainder (Hamilton) apportionment of an integer amount.
//!
//! Every share is computed exactly: the numerator `weight_i * total` is divided by the
//! common denominator `Σ weight` into an integer quotient and an exact remainder, so
//! remainders compare without binary rounding. The leftover cents go to the largest
//! remainders, lower index first on ties, which keeps the result stable across calls.

use std::ops::Neg;

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::model::Money;

/// Scale used when weights are too large for exact products and must be normalized.
const NORMALIZED_WEIGHT_SCALE: u32 = 6;

#[derive(Clone, Copy, Debug)]
struct Quota {
    base: i64,
    remainder: Decimal,
}

enum Apportionment {
    /// Weight sum is zero: nobody has a claim.
    Degenerate,
    Quotas(Vec<Quota>),
}

/// Splits `total` into `weights.len()` shares that sum exactly to `total`.
///
/// Shares are proportional to `weights`; negative weights count as zero. An empty
/// weight list yields no shares, and a zero total or zero weight sum yields all zeros.
/// A negative total is split by magnitude and the sign re-applied.
///
/// # Example
/// ```
/// use billsplit_domain::{Money, distribute};
/// use rust_decimal::Decimal;
///
/// let shares = distribute(Money::from_i64(500), &[Decimal::ONE; 3]);
/// assert_eq!(shares, [167, 167, 166].map(Money::from_i64));
/// ```
pub fn distribute(total: Money, weights: &[Decimal]) -> Vec<Money> {
    if weights.is_empty() {
        return Vec::new();
    }
    if total.is_negative() {
        return distribute(-total, weights)
            .into_iter()
            .map(Neg::neg)
            .collect();
    }

    let weights: Vec<Decimal> = weights.iter().map(|w| (*w).max(Decimal::ZERO)).collect();
    if total.is_zero() {
        return vec![Money::ZERO; weights.len()];
    }

    let apportionment = match exact_quotas(total.amount(), &weights) {
        Some(apportionment) => apportionment,
        None => {
            tracing::warn!(
                weight_count = weights.len(),
                total = total.amount(),
                scale = NORMALIZED_WEIGHT_SCALE,
                "Weights too large for exact apportionment; normalizing"
            );
            let normalized = normalize_weights(&weights);
            exact_quotas(total.amount(), &normalized).unwrap_or(Apportionment::Degenerate)
        }
    };

    let quotas = match apportionment {
        Apportionment::Degenerate => return vec![Money::ZERO; weights.len()],
        Apportionment::Quotas(quotas) => quotas,
    };

    let floored: i64 = quotas.iter().map(|quota| quota.base).sum();
    let residual = total.amount() - floored;
    let award_count = match usize::try_from(residual) {
        Ok(count) if count <= quotas.len() => count,
        _ => {
            tracing::error!(
                residual,
                weight_count = quotas.len(),
                total = total.amount(),
                "Apportionment residual out of range"
            );
            usize::try_from(residual).unwrap_or(0).min(quotas.len())
        }
    };

    let mut ranked: Vec<usize> = (0..quotas.len()).collect();
    ranked.sort_by(|&a, &b| {
        quotas[b]
            .remainder
            .cmp(&quotas[a].remainder)
            .then_with(|| a.cmp(&b))
    });

    let mut shares: Vec<i64> = quotas.iter().map(|quota| quota.base).collect();
    for &idx in ranked.iter().take(award_count) {
        shares[idx] += 1;
    }

    tracing::trace!(
        total = total.amount(),
        residual,
        awarded = ?&ranked[..award_count],
        "Distributed remainder cents"
    );

    shares.into_iter().map(Money::from_i64).collect()
}

/// Returns `None` when an intermediate value does not fit in a `Decimal`.
fn exact_quotas(total: i64, weights: &[Decimal]) -> Option<Apportionment> {
    let weight_sum = weights
        .iter()
        .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w))?;
    if weight_sum.is_zero() {
        return Some(Apportionment::Degenerate);
    }

    let total = Decimal::from(total);
    let quotas = weights
        .iter()
        .map(|weight| {
            let numerator = weight.checked_mul(total)?;
            let mut quotient = numerator.checked_div(weight_sum)?.floor();
            let mut remainder = numerator.checked_sub(quotient.checked_mul(weight_sum)?)?;
            // Division is rounded to 28 digits; settle the quotient against the exact remainder.
            while remainder.is_sign_negative() && !remainder.is_zero() {
                quotient -= Decimal::ONE;
                remainder += weight_sum;
            }
            while remainder >= weight_sum {
                quotient += Decimal::ONE;
                remainder -= weight_sum;
            }
            Some(Quota {
                base: quotient.to_i64()?,
                remainder,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(Apportionment::Quotas(quotas))
}

/// Divides every weight by the largest one, rounded to the normalized scale.
pub(crate) fn normalize_weights(weights: &[Decimal]) -> Vec<Decimal> {
    let max = weights.iter().copied().max().unwrap_or(Decimal::ZERO);
    if max.is_zero() {
        return weights.to_vec();
    }
    weights
        .iter()
        .map(|w| {
            w.checked_div(max)
                .unwrap_or(Decimal::ZERO)
                .round_dp(NORMALIZED_WEIGHT_SCALE)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn weights(values: &[i64]) -> Vec<Decimal> {
        values.iter().copied().map(Decimal::from).collect()
    }

    fn cents(values: &[i64]) -> Vec<Money> {
        values.iter().copied().map(Money::from_i64).collect()
    }

    #[rstest]
    #[case::three_ways(1000, &[1, 1, 1], &[334, 333, 333])]
    #[case::proportional_exact(1500, &[3000, 2500, 2000], &[600, 500, 400])]
    #[case::zero_total(0, &[1, 1, 1], &[0, 0, 0])]
    #[case::single_recipient(333, &[1], &[333])]
    #[case::two_ways(100, &[1, 1], &[50, 50])]
    #[case::one_cent_lower_index_wins(1, &[1, 1, 1], &[1, 0, 0])]
    #[case::two_cents_lower_index_wins(2, &[1, 1, 1], &[1, 1, 0])]
    #[case::everyone_five_dollars(500, &[1, 1, 1], &[167, 167, 166])]
    #[case::largest_remainder_beats_index(10, &[1, 2], &[3, 7])]
    #[case::zero_weight_sum(1000, &[0, 0], &[0, 0])]
    #[case::zero_weight_gets_nothing(101, &[1, 0, 1], &[51, 0, 50])]
    #[case::custom_two_to_one(900, &[2, 1], &[600, 300])]
    #[case::proportional_tip(600, &[2000, 1000], &[400, 200])]
    fn distributes(#[case] total: i64, #[case] w: &[i64], #[case] expected: &[i64]) {
        let shares = distribute(Money::from_i64(total), &weights(w));
        assert_eq!(shares, cents(expected));
        assert_eq!(shares.iter().sum::<Money>(), Money::from_i64(total));
    }

    #[test]
    fn empty_weights_yield_no_shares() {
        assert!(distribute(Money::from_i64(1000), &[]).is_empty());
    }

    #[test]
    fn negative_weights_count_as_zero() {
        let shares = distribute(Money::from_i64(10), &weights(&[-5, 1]));
        assert_eq!(shares, cents(&[0, 10]));
    }

    #[test]
    fn negative_total_mirrors_positive_split() {
        let shares = distribute(Money::from_i64(-1000), &weights(&[1, 1, 1]));
        assert_eq!(shares, cents(&[-334, -333, -333]));
    }

    #[test]
    fn fractional_weights_split_exactly() {
        let w = [Decimal::new(15, 1), Decimal::new(5, 1)];
        let shares = distribute(Money::from_i64(100), &w);
        assert_eq!(shares, cents(&[75, 25]));
    }

    #[test]
    fn repeating_fraction_weights_keep_zero_residual() {
        let third = Decimal::ONE / Decimal::from(3);
        let shares = distribute(Money::from_i64(1000), &[third, third, third]);
        assert_eq!(shares.iter().sum::<Money>(), Money::from_i64(1000));
        assert_eq!(shares, cents(&[334, 333, 333]));
    }

    #[test]
    fn overflowing_weights_fall_back_to_normalized_split() {
        let huge = Decimal::MAX / Decimal::TWO;
        let shares = distribute(Money::from_i64(1001), &[huge, huge]);
        assert_eq!(shares, cents(&[501, 500]));
    }

    #[test]
    fn overflowing_weights_keep_itemized_breakdown_total() {
        use crate::model::{Assignment, Assignments, Item, ItemId, Person, Portion, SplitNote};
        use crate::services::{compute_itemized_breakdown, compute_results};

        let huge = Decimal::MAX / Decimal::TWO;
        let people = [Person::new("a", "Alice"), Person::new("b", "Bob")];
        let items = [Item::new("i1", "Tasting menu", Money::from_i64(1001))];
        let mut assignments = Assignments::new();
        assignments.set(
            ItemId::from("i1"),
            Assignment::Custom {
                portions: vec![Portion::new("a", huge), Portion::new("b", huge)],
            },
        );

        let breakdown = compute_itemized_breakdown(&people, &items, &assignments);
        let shares: Vec<Money> = breakdown.iter().map(|b| b.items[0].their_share).collect();
        assert_eq!(shares, cents(&[501, 500]));
        for person in &breakdown {
            assert_eq!(
                person.items[0].split_note,
                Some(SplitNote::Share {
                    weight: Decimal::ONE,
                    total: Decimal::TWO
                })
            );
        }

        let results = compute_results(&people, &items, &assignments, &Default::default());
        let subtotals: Vec<Money> = results.per_person.iter().map(|p| p.subtotal).collect();
        assert_eq!(subtotals, shares);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let w = weights(&[7, 3, 11, 3]);
        let first = distribute(Money::from_i64(9_999), &w);
        for _ in 0..100 {
            assert_eq!(distribute(Money::from_i64(9_999), &w), first);
        }
    }
}
