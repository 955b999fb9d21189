use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{
    model::{
        Assignments, BillConfig, BillResults, Item, Money, Person, PersonId, PersonResult,
        SplitMode, TaxMode,
    },
    services::{AssignmentResolver, distribute},
};

/// Folds a bill snapshot into per-person subtotals, tip, tax and totals.
pub struct ResultsAggregator<'a> {
    resolver: AssignmentResolver<'a>,
}

impl<'a> ResultsAggregator<'a> {
    pub fn new(people: &'a [Person]) -> Self {
        Self {
            resolver: AssignmentResolver::new(people),
        }
    }

    /// Computes reconciled results for `items`.
    ///
    /// # Returns
    /// Results whose `grand_total_check` is zero. With no people the result is all
    /// zeros with an empty `per_person`.
    pub fn compute(
        &self,
        items: &[Item],
        assignments: &Assignments,
        config: &BillConfig,
    ) -> BillResults {
        let roster = self.resolver.roster();
        if roster.is_empty() {
            return BillResults::default();
        }

        let subtotals = self.accumulate_subtotals(items, assignments);
        let person_subtotals: Vec<Money> = subtotals.values().copied().collect();
        let subtotal: Money = person_subtotals.iter().sum();

        let tip = percent_of(subtotal, config.tip_percent);
        let tip_shares = distribute(tip, &split_weights(config.tip_split, &person_subtotals));

        let tax = match config.tax {
            TaxMode::Amount(amount) => amount,
            TaxMode::Percent(percent) => percent_of(subtotal, percent),
        };
        let tax_shares = distribute(tax, &split_weights(config.tax_split, &person_subtotals));

        let per_person: Vec<PersonResult> = roster
            .iter()
            .zip(person_subtotals)
            .zip(tip_shares.into_iter().zip(tax_shares))
            .map(|((person, subtotal), (tip, tax))| PersonResult {
                person_id: person.id.clone(),
                name: person.name.clone(),
                subtotal,
                tip,
                tax,
                total: subtotal + tip + tax,
            })
            .collect();

        let grand_total = subtotal + tip + tax;
        let grand_total_check = grand_total - per_person.iter().map(|p| p.total).sum::<Money>();
        if !grand_total_check.is_zero() {
            tracing::error!(
                grand_total = grand_total.amount(),
                grand_total_check = grand_total_check.amount(),
                person_count = per_person.len(),
                "Bill results failed reconciliation check"
            );
        }

        tracing::debug!(
            person_count = per_person.len(),
            item_count = items.len(),
            subtotal = subtotal.amount(),
            tip = tip.amount(),
            tax = tax.amount(),
            grand_total = grand_total.amount(),
            "Bill results computed"
        );

        BillResults {
            subtotal,
            tip,
            tax,
            grand_total,
            per_person,
            grand_total_check,
        }
    }

    fn accumulate_subtotals(
        &self,
        items: &[Item],
        assignments: &Assignments,
    ) -> IndexMap<&'a PersonId, Money> {
        let mut subtotals: IndexMap<&'a PersonId, Money> = self
            .resolver
            .roster()
            .iter()
            .map(|person| (&person.id, Money::ZERO))
            .collect();

        for item in items {
            let Some(resolution) = self.resolver.resolve(assignments.get(&item.id)) else {
                continue;
            };
            for (person, share) in resolution.allocate(item.price) {
                if let Some(subtotal) = subtotals.get_mut(&person.id) {
                    *subtotal += share;
                }
            }
        }

        subtotals
    }
}

/// Computes bill results from a snapshot of people, items, assignments and tip/tax settings.
pub fn compute_results(
    people: &[Person],
    items: &[Item],
    assignments: &Assignments,
    config: &BillConfig,
) -> BillResults {
    ResultsAggregator::new(people).compute(items, assignments, config)
}

/// `round(amount * percent / 100)`, halves rounded up. Negative percentages count as zero.
fn percent_of(amount: Money, percent: Decimal) -> Money {
    let percent = percent.max(Decimal::ZERO);
    let rounded = amount
        .as_decimal()
        .checked_mul(percent)
        .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64());

    match rounded {
        Some(cents) => Money::from_i64(cents),
        None => {
            tracing::warn!(
                amount = amount.amount(),
                percent = %percent,
                "Percentage amount out of range; using zero"
            );
            Money::ZERO
        }
    }
}

/// Uniform weights for `Equal`, subtotals for `Proportional`. Falls back to uniform when
/// no subtotal is positive so the allocator always has something to split by.
fn split_weights(mode: SplitMode, subtotals: &[Money]) -> Vec<Decimal> {
    let uniform = || vec![Decimal::ONE; subtotals.len()];
    match mode {
        SplitMode::Equal => uniform(),
        SplitMode::Proportional => {
            if subtotals.iter().all(|subtotal| subtotal.amount() <= 0) {
                uniform()
            } else {
                subtotals.iter().map(|subtotal| subtotal.as_decimal()).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assignment, ItemId, Portion};
    use rstest::rstest;

    fn person(id: &str, name: &str) -> Person {
        Person::new(id, name)
    }

    fn item(id: &str, name: &str, cents: i64) -> Item {
        Item::new(id, name, Money::from_i64(cents))
    }

    fn assignments(entries: Vec<(&str, Assignment)>) -> Assignments {
        entries
            .into_iter()
            .map(|(id, assignment)| (ItemId::from(id), assignment))
            .collect()
    }

    fn single(id: &str) -> Assignment {
        Assignment::Single {
            person_id: id.into(),
        }
    }

    fn equal(ids: &[&str]) -> Assignment {
        Assignment::Equal {
            person_ids: ids.iter().copied().map(PersonId::from).collect(),
        }
    }

    fn config(
        tip_percent: i64,
        tip_split: SplitMode,
        tax: TaxMode,
        tax_split: SplitMode,
    ) -> BillConfig {
        BillConfig {
            tip_percent: Decimal::from(tip_percent),
            tip_split,
            tax,
            tax_split,
        }
    }

    fn subtotals(results: &BillResults) -> Vec<i64> {
        results
            .per_person
            .iter()
            .map(|p| p.subtotal.amount())
            .collect()
    }

    #[test]
    fn empty_people_yield_zero_results() {
        let results = compute_results(
            &[],
            &[item("i1", "Burger", 1200)],
            &assignments(vec![("i1", Assignment::Everyone)]),
            &config(20, SplitMode::Proportional, TaxMode::Amount(Money::from_i64(100)), SplitMode::Equal),
        );
        assert_eq!(results, BillResults::default());
        assert!(results.per_person.is_empty());
    }

    #[test]
    fn single_assignment_charges_full_price() {
        let people = [person("a", "Alice")];
        let results = compute_results(
            &people,
            &[item("i1", "Burger", 1200)],
            &assignments(vec![("i1", single("a"))]),
            &BillConfig::default(),
        );
        assert_eq!(results.subtotal, Money::from_i64(1200));
        assert_eq!(results.tip, Money::ZERO);
        assert_eq!(results.tax, Money::ZERO);
        assert_eq!(subtotals(&results), vec![1200]);
        assert!(results.is_reconciled());
    }

    #[rstest]
    #[case::even_split(1200, vec![600, 600])]
    #[case::odd_cent(301, vec![151, 150])]
    fn equal_split_between_two(#[case] price: i64, #[case] expected: Vec<i64>) {
        let people = [person("a", "Alice"), person("b", "Bob")];
        let results = compute_results(
            &people,
            &[item("i1", "Pizza", price)],
            &assignments(vec![("i1", equal(&["a", "b"]))]),
            &BillConfig::default(),
        );
        assert_eq!(subtotals(&results), expected);
        assert_eq!(results.subtotal, Money::from_i64(price));
        assert!(results.is_reconciled());
    }

    #[test]
    fn custom_portions_split_by_weight() {
        let people = [person("a", "Alice"), person("b", "Bob")];
        let portions = vec![
            Portion::new("a", Decimal::TWO),
            Portion::new("b", Decimal::ONE),
        ];
        let results = compute_results(
            &people,
            &[item("i1", "Steak", 900)],
            &assignments(vec![("i1", Assignment::Custom { portions })]),
            &BillConfig::default(),
        );
        assert_eq!(subtotals(&results), vec![600, 300]);
        assert!(results.is_reconciled());
    }

    #[test]
    fn everyone_splits_across_all_people() {
        let people = [person("a", "Alice"), person("b", "Bob"), person("c", "Carol")];
        let results = compute_results(
            &people,
            &[item("i1", "Nachos", 500)],
            &assignments(vec![("i1", Assignment::Everyone)]),
            &BillConfig::default(),
        );
        assert_eq!(subtotals(&results), vec![167, 167, 166]);
        assert_eq!(results.subtotal, Money::from_i64(500));
    }

    #[rstest]
    #[case::explicit_unassigned(assignments(vec![("i1", Assignment::Unassigned)]))]
    #[case::no_entry(Assignments::new())]
    #[case::dangling_single(assignments(vec![("i1", single("ghost"))]))]
    #[case::dangling_equal(assignments(vec![("i1", equal(&["ghost"]))]))]
    fn unresolved_items_are_excluded(#[case] assignments: Assignments) {
        let people = [person("a", "Alice")];
        let results = compute_results(
            &people,
            &[item("i1", "Water", 200)],
            &assignments,
            &BillConfig::default(),
        );
        assert_eq!(results.subtotal, Money::ZERO);
        assert_eq!(subtotals(&results), vec![0]);
        assert!(results.is_reconciled());
    }

    #[test]
    fn assignment_for_missing_item_is_ignored() {
        let people = [person("a", "Alice")];
        let results = compute_results(
            &people,
            &[item("i1", "Water", 200)],
            &assignments(vec![("i1", single("a")), ("gone", single("a"))]),
            &BillConfig::default(),
        );
        assert_eq!(results.subtotal, Money::from_i64(200));
    }

    #[rstest]
    #[case::proportional(20, SplitMode::Proportional, 600, vec![400, 200])]
    #[case::equal(18, SplitMode::Equal, 540, vec![270, 270])]
    fn tip_is_rounded_and_distributed(
        #[case] tip_percent: i64,
        #[case] tip_split: SplitMode,
        #[case] expected_tip: i64,
        #[case] expected_shares: Vec<i64>,
    ) {
        let people = [person("a", "Alice"), person("b", "Bob")];
        let results = compute_results(
            &people,
            &[item("i1", "Entree A", 2000), item("i2", "Entree B", 1000)],
            &assignments(vec![("i1", single("a")), ("i2", single("b"))]),
            &config(tip_percent, tip_split, TaxMode::default(), SplitMode::Equal),
        );
        assert_eq!(results.subtotal, Money::from_i64(3000));
        assert_eq!(results.tip, Money::from_i64(expected_tip));
        let shares: Vec<i64> = results.per_person.iter().map(|p| p.tip.amount()).collect();
        assert_eq!(shares, expected_shares);
        assert!(results.is_reconciled());
    }

    #[test]
    fn fractional_tip_percent_rounds_half_up() {
        let people = [person("a", "Alice")];
        let mut cfg = BillConfig::default();
        cfg.tip_percent = Decimal::new(125, 1);
        let results = compute_results(
            &people,
            &[item("i1", "Soup", 1004)],
            &assignments(vec![("i1", single("a"))]),
            &cfg,
        );
        // 1004 * 12.5% = 125.5
        assert_eq!(results.tip, Money::from_i64(126));
    }

    #[rstest]
    #[case::fixed_amount(TaxMode::Amount(Money::from_i64(200)), 1000, 200)]
    #[case::percent(TaxMode::Percent(Decimal::TEN), 2000, 200)]
    fn tax_modes(#[case] tax: TaxMode, #[case] price: i64, #[case] expected_tax: i64) {
        let people = [person("a", "Alice"), person("b", "Bob")];
        let results = compute_results(
            &people,
            &[item("i1", "Shared", price)],
            &assignments(vec![("i1", equal(&["a", "b"]))]),
            &config(0, SplitMode::Equal, tax, SplitMode::Equal),
        );
        assert_eq!(results.tax, Money::from_i64(expected_tax));
        let shares: Vec<i64> = results.per_person.iter().map(|p| p.tax.amount()).collect();
        assert_eq!(shares, vec![expected_tax / 2, expected_tax / 2]);
        assert!(results.is_reconciled());
    }

    #[test]
    fn proportional_with_zero_subtotals_falls_back_to_equal() {
        let people = [person("a", "Alice"), person("b", "Bob")];
        let results = compute_results(
            &people,
            &[item("i1", "Water", 200)],
            &Assignments::new(),
            &config(
                20,
                SplitMode::Proportional,
                TaxMode::Amount(Money::from_i64(301)),
                SplitMode::Proportional,
            ),
        );
        assert_eq!(results.tip, Money::ZERO);
        let taxes: Vec<i64> = results.per_person.iter().map(|p| p.tax.amount()).collect();
        assert_eq!(taxes, vec![151, 150]);
        assert_eq!(results.grand_total, Money::from_i64(301));
        assert!(results.is_reconciled());
    }

    #[test]
    fn mixed_bill_reconciles() {
        let people = [person("a", "Alice"), person("b", "Bob"), person("c", "Carol")];
        let items = [
            item("i1", "Appetizer", 999),
            item("i2", "Entree A", 1499),
            item("i3", "Entree B", 2000),
            item("i4", "Dessert", 701),
        ];
        let table = assignments(vec![
            ("i1", Assignment::Everyone),
            ("i2", single("a")),
            ("i3", equal(&["b", "c"])),
            (
                "i4",
                Assignment::Custom {
                    portions: vec![
                        Portion::new("a", Decimal::TWO),
                        Portion::new("b", Decimal::ONE),
                    ],
                },
            ),
        ]);
        let results = compute_results(
            &people,
            &items,
            &table,
            &config(
                18,
                SplitMode::Proportional,
                TaxMode::Percent(Decimal::new(8, 0)),
                SplitMode::Proportional,
            ),
        );

        assert_eq!(results.subtotal, Money::from_i64(5199));
        assert_eq!(
            results.grand_total,
            results.subtotal + results.tip + results.tax
        );
        for p in &results.per_person {
            assert_eq!(p.total, p.subtotal + p.tip + p.tax);
        }
        assert!(results.is_reconciled());
    }

    #[test]
    fn duplicate_people_are_counted_once() {
        let people = [person("a", "Alice"), person("a", "Alice")];
        let results = compute_results(
            &people,
            &[item("i1", "Tea", 300)],
            &assignments(vec![("i1", Assignment::Everyone)]),
            &BillConfig::default(),
        );
        assert_eq!(subtotals(&results), vec![300]);
        assert!(results.is_reconciled());
    }

    #[rstest]
    #[case::one_person(&["a"])]
    #[case::two_people(&["a", "b"])]
    fn saturated_prices_still_reconcile(#[case] ids: &[&str]) {
        let people: Vec<Person> = ids.iter().map(|id| person(id, id)).collect();
        let huge = crate::money::parse_decimal_to_cents("99999999999999999999");
        let items = [Item::new("i1", "Yacht", huge), Item::new("i2", "Jet", huge)];

        let results = compute_results(
            &people,
            &items,
            &assignments(vec![("i1", Assignment::Everyone), ("i2", Assignment::Everyone)]),
            &BillConfig {
                tip_percent: Decimal::from(18),
                tip_split: SplitMode::Proportional,
                tax: TaxMode::Percent(Decimal::from(8)),
                tax_split: SplitMode::Equal,
            },
        );

        assert_eq!(results.subtotal, Money::from_i64(i64::MAX));
        assert_eq!(results.grand_total, Money::from_i64(i64::MAX));
        assert!(results.is_reconciled());
    }
}
