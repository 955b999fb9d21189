use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use indexmap::{IndexMap, map::Entry};
use rust_decimal::Decimal;

use crate::money::format_cents_to_decimal;

/// An amount of money in integer cents.
///
/// Arithmetic saturates at the `i64` bounds, matching how oversized input is parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub fn from_i64(cents: i64) -> Self {
        Self(cents)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    pub fn as_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    pub fn to_decimal_string(self) -> String {
        format_cents_to_decimal(self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cents_to_decimal(*self))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: Money,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Portion {
    pub person_id: PersonId,
    pub weight: Decimal,
}

impl Portion {
    pub fn new(person_id: impl Into<PersonId>, weight: Decimal) -> Self {
        Self {
            person_id: person_id.into(),
            weight,
        }
    }
}

/// How one item's price is split among people.
///
/// `Equal` and `Custom` lists are order-significant: earlier entries win
/// remainder-cent ties.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Assignment {
    #[default]
    Unassigned,
    Single {
        person_id: PersonId,
    },
    Equal {
        person_ids: Vec<PersonId>,
    },
    /// Resolved against the people present at computation time.
    Everyone,
    Custom {
        portions: Vec<Portion>,
    },
}

impl Assignment {
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Self::Unassigned)
    }

    /// Drops every reference to `person_id`, collapsing to `Unassigned` when nobody is left.
    pub(crate) fn detach_person(&mut self, person_id: &PersonId) {
        match self {
            Self::Single { person_id: assigned } if assigned == person_id => {
                *self = Self::Unassigned;
            }
            Self::Equal { person_ids } => {
                person_ids.retain(|id| id != person_id);
                if person_ids.is_empty() {
                    *self = Self::Unassigned;
                }
            }
            Self::Custom { portions } => {
                portions.retain(|portion| &portion.person_id != person_id);
                if portions.is_empty() {
                    *self = Self::Unassigned;
                }
            }
            Self::Unassigned | Self::Single { .. } | Self::Everyone => {}
        }
    }
}

static UNASSIGNED: Assignment = Assignment::Unassigned;

/// Per-item assignment table. At most one entry per item; a missing entry reads as
/// `Assignment::Unassigned`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignments {
    entries: IndexMap<ItemId, Assignment>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item_id: &ItemId) -> &Assignment {
        self.entries.get(item_id).unwrap_or(&UNASSIGNED)
    }

    pub fn set(&mut self, item_id: ItemId, assignment: Assignment) {
        self.entries.insert(item_id, assignment);
    }

    pub fn remove(&mut self, item_id: &ItemId) -> Option<Assignment> {
        self.entries.shift_remove(item_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Assignment)> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn detach_person(&mut self, person_id: &PersonId) {
        for assignment in self.entries.values_mut() {
            assignment.detach_person(person_id);
        }
    }
}

impl FromIterator<(ItemId, Assignment)> for Assignments {
    /// Keeps the first entry seen for each item.
    fn from_iter<I: IntoIterator<Item = (ItemId, Assignment)>>(iter: I) -> Self {
        let mut entries = IndexMap::new();
        for (item_id, assignment) in iter {
            if let Entry::Vacant(slot) = entries.entry(item_id) {
                slot.insert(assignment);
            }
        }
        Self { entries }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitMode {
    #[default]
    Equal,
    Proportional,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaxMode {
    /// Fixed tax in cents.
    Amount(Money),
    /// Tax as a percentage of the assigned subtotal.
    Percent(Decimal),
}

impl Default for TaxMode {
    fn default() -> Self {
        Self::Amount(Money::ZERO)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BillConfig {
    pub tip_percent: Decimal,
    pub tip_split: SplitMode,
    pub tax: TaxMode,
    pub tax_split: SplitMode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonResult {
    pub person_id: PersonId,
    pub name: String,
    pub subtotal: Money,
    pub tip: Money,
    pub tax: Money,
    pub total: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillResults {
    pub subtotal: Money,
    pub tip: Money,
    pub tax: Money,
    pub grand_total: Money,
    pub per_person: Vec<PersonResult>,
    /// `grand_total - Σ per_person.total`; zero whenever the engine is correct.
    pub grand_total_check: Money,
}

impl BillResults {
    pub fn is_reconciled(&self) -> bool {
        self.grand_total_check.is_zero()
    }
}

/// Describes how an item was shared, from one recipient's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitNote {
    Ways(usize),
    Share { weight: Decimal, total: Decimal },
}

impl fmt::Display for SplitNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ways(count) => write!(f, "split {count} ways"),
            Self::Share { weight, total } => {
                write!(f, "{}/{} share", weight.normalize(), total.normalize())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonItemizedEntry {
    pub item_id: ItemId,
    pub item_name: String,
    pub full_price: Money,
    pub their_share: Money,
    pub split_note: Option<SplitNote>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonItemizedBreakdown {
    pub person_id: PersonId,
    pub name: String,
    pub items: Vec<PersonItemizedEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(values: &[&str]) -> Vec<PersonId> {
        values.iter().copied().map(PersonId::from).collect()
    }

    #[rstest]
    #[case::single_match(
        Assignment::Single { person_id: "a".into() },
        Assignment::Unassigned
    )]
    #[case::single_other(
        Assignment::Single { person_id: "b".into() },
        Assignment::Single { person_id: "b".into() }
    )]
    #[case::equal_filtered(
        Assignment::Equal { person_ids: ids(&["a", "b", "c"]) },
        Assignment::Equal { person_ids: ids(&["b", "c"]) }
    )]
    #[case::equal_emptied(
        Assignment::Equal { person_ids: ids(&["a"]) },
        Assignment::Unassigned
    )]
    #[case::custom_filtered(
        Assignment::Custom {
            portions: vec![Portion::new("a", Decimal::ONE), Portion::new("b", Decimal::TWO)],
        },
        Assignment::Custom { portions: vec![Portion::new("b", Decimal::TWO)] }
    )]
    #[case::custom_emptied(
        Assignment::Custom { portions: vec![Portion::new("a", Decimal::ONE)] },
        Assignment::Unassigned
    )]
    #[case::everyone_untouched(Assignment::Everyone, Assignment::Everyone)]
    fn detach_person_cascades(#[case] mut assignment: Assignment, #[case] expected: Assignment) {
        assignment.detach_person(&PersonId::from("a"));
        assert_eq!(assignment, expected);
    }

    #[test]
    fn missing_assignment_reads_as_unassigned() {
        let assignments = Assignments::new();
        assert!(assignments.get(&ItemId::from("nope")).is_unassigned());
    }

    #[test]
    fn from_iter_keeps_first_entry_per_item() {
        let assignments: Assignments = [
            (ItemId::from("i1"), Assignment::Everyone),
            (ItemId::from("i1"), Assignment::Unassigned),
        ]
        .into_iter()
        .collect();

        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments.get(&ItemId::from("i1")), &Assignment::Everyone);
    }

    #[rstest]
    #[case::ways(SplitNote::Ways(3), "split 3 ways")]
    #[case::share(
        SplitNote::Share { weight: Decimal::TWO, total: Decimal::new(3, 0) },
        "2/3 share"
    )]
    #[case::fractional_share(
        SplitNote::Share { weight: Decimal::new(150, 2), total: Decimal::new(250, 2) },
        "1.5/2.5 share"
    )]
    fn split_note_display(#[case] note: SplitNote, #[case] expected: &str) {
        assert_eq!(note.to_string(), expected);
    }

    #[test]
    fn money_display_uses_two_decimals() {
        assert_eq!(Money::from_i64(1234).to_string(), "12.34");
    }

    #[rstest]
    #[case::add(Money::from_i64(i64::MAX) + Money::from_i64(1), i64::MAX)]
    #[case::sub(Money::from_i64(i64::MIN) - Money::from_i64(1), i64::MIN)]
    #[case::neg(-Money::from_i64(i64::MIN), i64::MAX)]
    #[case::sum([i64::MAX, i64::MAX, 5].map(Money::from_i64).into_iter().sum::<Money>(), i64::MAX)]
    fn money_arithmetic_saturates(#[case] value: Money, #[case] expected: i64) {
        assert_eq!(value.amount(), expected);
    }
}
