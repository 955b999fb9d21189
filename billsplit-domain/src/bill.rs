use rust_decimal::Decimal;

use crate::{
    model::{
        Assignment, Assignments, BillConfig, BillResults, Item, ItemId, Money, Person, PersonId,
        PersonItemizedBreakdown, SplitMode, TaxMode,
    },
    services::{compute_itemized_breakdown, compute_results},
};

/// Partial update for an item; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub price: Option<Money>,
}

/// Mutable bill state: people, items, their assignments and the tip/tax settings.
///
/// Every mutation keeps the snapshot consistent. Removing a person detaches them from
/// every assignment, removing an item drops its assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bill {
    people: Vec<Person>,
    items: Vec<Item>,
    assignments: Assignments,
    config: BillConfig,
}

impl Bill {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a bill from stored parts, dropping duplicate ids and assignments for
    /// items that do not exist.
    pub fn from_parts(
        people: Vec<Person>,
        items: Vec<Item>,
        assignments: Assignments,
        config: BillConfig,
    ) -> Self {
        let mut bill = Self {
            config,
            ..Self::default()
        };
        for person in people {
            bill.add_person(person);
        }
        for item in items {
            bill.add_item(item);
        }
        for (item_id, assignment) in assignments.iter() {
            bill.set_assignment(item_id, assignment.clone());
        }
        bill
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    pub fn config(&self) -> &BillConfig {
        &self.config
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|person| &person.id == id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Returns `false` if a person with the same id is already on the bill.
    pub fn add_person(&mut self, person: Person) -> bool {
        if self.person(&person.id).is_some() {
            tracing::warn!(person_id = %person.id, "Person already on bill");
            return false;
        }
        self.people.push(person);
        true
    }

    pub fn rename_person(&mut self, id: &PersonId, name: impl Into<String>) -> bool {
        match self.people.iter_mut().find(|person| &person.id == id) {
            Some(person) => {
                person.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Removes the person and detaches them from every assignment.
    pub fn remove_person(&mut self, id: &PersonId) -> Option<Person> {
        let index = self.people.iter().position(|person| &person.id == id)?;
        let removed = self.people.remove(index);
        self.assignments.detach_person(id);
        tracing::debug!(person_id = %id, "Removed person from bill");
        Some(removed)
    }

    /// Returns `false` if an item with the same id already exists.
    pub fn add_item(&mut self, item: Item) -> bool {
        if self.item(&item.id).is_some() {
            tracing::warn!(item_id = %item.id, "Item already on bill");
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn update_item(&mut self, id: &ItemId, changes: ItemChanges) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        if let Some(name) = changes.name {
            item.name = name;
        }
        if let Some(price) = changes.price {
            item.price = price;
        }
        true
    }

    /// Removes the item together with its assignment.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        self.assignments.remove(id);
        Some(self.items.remove(index))
    }

    /// Replaces the item's assignment. Returns `false` when the item does not exist.
    pub fn set_assignment(&mut self, item_id: &ItemId, assignment: Assignment) -> bool {
        if self.item(item_id).is_none() {
            tracing::warn!(item_id = %item_id, "Ignoring assignment for unknown item");
            return false;
        }
        self.assignments.set(item_id.clone(), assignment);
        true
    }

    pub fn set_config(&mut self, config: BillConfig) {
        self.config = config;
    }

    pub fn set_tip(&mut self, percent: Decimal, split: SplitMode) {
        self.config.tip_percent = percent;
        self.config.tip_split = split;
    }

    pub fn set_tax(&mut self, tax: TaxMode, split: SplitMode) {
        self.config.tax = tax;
        self.config.tax_split = split;
    }

    pub fn results(&self) -> BillResults {
        compute_results(&self.people, &self.items, &self.assignments, &self.config)
    }

    pub fn itemized_breakdown(&self) -> Vec<PersonItemizedBreakdown> {
        compute_itemized_breakdown(&self.people, &self.items, &self.assignments)
    }
}
