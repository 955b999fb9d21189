use indexmap::IndexMap;

use crate::{
    model::{Assignments, Item, Person, PersonId, PersonItemizedBreakdown, PersonItemizedEntry},
    services::AssignmentResolver,
};

/// Rebuilds each person's item list from the same resolution and allocation the
/// aggregator uses, so the entries always sum to the person's subtotal.
pub struct ItemizedBreakdownBuilder<'a> {
    resolver: AssignmentResolver<'a>,
}

impl<'a> ItemizedBreakdownBuilder<'a> {
    pub fn new(people: &'a [Person]) -> Self {
        Self {
            resolver: AssignmentResolver::new(people),
        }
    }

    pub fn build(&self, items: &[Item], assignments: &Assignments) -> Vec<PersonItemizedBreakdown> {
        let mut entries: IndexMap<&'a PersonId, Vec<PersonItemizedEntry>> = self
            .resolver
            .roster()
            .iter()
            .map(|person| (&person.id, Vec::new()))
            .collect();

        for item in items {
            let Some(resolution) = self.resolver.resolve(assignments.get(&item.id)) else {
                continue;
            };
            for (index, (person, share)) in resolution.allocate(item.price).into_iter().enumerate()
            {
                let Some(list) = entries.get_mut(&person.id) else {
                    continue;
                };
                list.push(PersonItemizedEntry {
                    item_id: item.id.clone(),
                    item_name: item.name.clone(),
                    full_price: item.price,
                    their_share: share,
                    split_note: resolution.split_note_for(index),
                });
            }
        }

        self.resolver
            .roster()
            .iter()
            .zip(entries.into_values())
            .map(|(person, items)| PersonItemizedBreakdown {
                person_id: person.id.clone(),
                name: person.name.clone(),
                items,
            })
            .collect()
    }
}

pub fn compute_itemized_breakdown(
    people: &[Person],
    items: &[Item],
    assignments: &Assignments,
) -> Vec<PersonItemizedBreakdown> {
    ItemizedBreakdownBuilder::new(people).build(items, assignments)
}
