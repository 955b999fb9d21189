use std::collections::hash_map::Entry;

use fxhash::{FxHashMap, FxHashSet};
use rust_decimal::Decimal;

use crate::{
    model::{Assignment, Money, Person, PersonId, SplitNote},
    services::{allocator::normalize_weights, distribute},
};

/// How a resolved item's price is weighted across its recipients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Weights {
    /// One recipient takes the full price.
    Whole,
    Uniform,
    /// Parallel to the recipient list.
    Custom(Vec<Decimal>),
}

/// Recipients of one item plus the weights their shares are allocated by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution<'a> {
    recipients: Vec<&'a Person>,
    weights: Weights,
}

impl<'a> Resolution<'a> {
    pub fn recipients(&self) -> &[&'a Person] {
        &self.recipients
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Allocates `price` across the recipients, in recipient order.
    pub fn allocate(&self, price: Money) -> Vec<(&'a Person, Money)> {
        let shares = match &self.weights {
            Weights::Whole => vec![price],
            Weights::Uniform => distribute(price, &vec![Decimal::ONE; self.recipients.len()]),
            Weights::Custom(weights) => distribute(price, weights),
        };
        self.recipients.iter().copied().zip(shares).collect()
    }

    /// Describes the split as seen by the recipient at `index`.
    pub fn split_note_for(&self, index: usize) -> Option<SplitNote> {
        match &self.weights {
            Weights::Whole => None,
            Weights::Uniform => Some(SplitNote::Ways(self.recipients.len())),
            Weights::Custom(weights) => {
                let weight = *weights.get(index)?;
                match weights
                    .iter()
                    .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w))
                {
                    Some(total) => Some(SplitNote::Share { weight, total }),
                    None => {
                        tracing::warn!(
                            weight_count = weights.len(),
                            "Weights too large to total; describing normalized share"
                        );
                        // Normalized weights are at most 1 each, so their sum cannot overflow.
                        let normalized = normalize_weights(weights);
                        Some(SplitNote::Share {
                            weight: *normalized.get(index)?,
                            total: normalized.iter().copied().sum(),
                        })
                    }
                }
            }
        }
    }
}

/// Resolves assignments against the people currently on the bill.
///
/// People are de-duplicated by id, first occurrence wins; references to anyone not on
/// the roster are dropped.
pub struct AssignmentResolver<'a> {
    roster: Vec<&'a Person>,
    lookup: FxHashMap<&'a PersonId, &'a Person>,
}

impl<'a> AssignmentResolver<'a> {
    pub fn new(people: &'a [Person]) -> Self {
        let mut roster = Vec::with_capacity(people.len());
        let mut lookup = FxHashMap::default();

        for person in people {
            match lookup.entry(&person.id) {
                Entry::Vacant(slot) => {
                    slot.insert(person);
                    roster.push(person);
                }
                Entry::Occupied(_) => {
                    tracing::warn!(person_id = %person.id, "Ignoring duplicate person id");
                }
            }
        }

        Self { roster, lookup }
    }

    pub fn roster(&self) -> &[&'a Person] {
        &self.roster
    }

    pub fn person(&self, id: &PersonId) -> Option<&'a Person> {
        self.lookup.get(id).copied()
    }

    pub fn is_present(&self, id: &PersonId) -> bool {
        self.lookup.contains_key(id)
    }

    /// Returns `None` when the item contributes to nobody.
    pub fn resolve(&self, assignment: &Assignment) -> Option<Resolution<'a>> {
        let resolution = match assignment {
            Assignment::Unassigned => return None,
            Assignment::Single { person_id } => Resolution {
                recipients: vec![self.person(person_id)?],
                weights: Weights::Whole,
            },
            Assignment::Equal { person_ids } => Resolution {
                recipients: self.present_unique(person_ids.iter()),
                weights: Weights::Uniform,
            },
            Assignment::Everyone => Resolution {
                recipients: self.roster.clone(),
                weights: Weights::Uniform,
            },
            Assignment::Custom { portions } => {
                let mut seen = FxHashSet::default();
                let (recipients, weights): (Vec<&'a Person>, Vec<Decimal>) = portions
                    .iter()
                    .filter(|portion| portion.weight > Decimal::ZERO)
                    .filter_map(|portion| {
                        let person = self.person(&portion.person_id)?;
                        seen.insert(&person.id).then_some((person, portion.weight))
                    })
                    .unzip();
                Resolution {
                    recipients,
                    weights: Weights::Custom(weights),
                }
            }
        };

        if resolution.recipients.is_empty() {
            return None;
        }
        Some(resolution)
    }

    fn present_unique<'b, I>(&self, ids: I) -> Vec<&'a Person>
    where
        I: Iterator<Item = &'b PersonId>,
    {
        let mut seen = FxHashSet::default();
        let mut recipients = Vec::new();
        for id in ids {
            if let Some(person) = self.person(id)
                && seen.insert(&person.id)
            {
                recipients.push(person);
            }
        }
        recipients
    }
}
