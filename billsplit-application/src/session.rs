use billsplit_domain::{
    Assignment, Bill, BillResults, Item, ItemChanges, ItemId, Money, Person, PersonId,
    PersonItemizedBreakdown, SplitMode, TaxMode,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Interactive editing on top of [`Bill`]: fresh ids for new people and items, and
/// trimmed names.
#[derive(Clone, Debug, Default)]
pub struct BillSession {
    bill: Bill,
}

impl BillSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bill(bill: Bill) -> Self {
        Self { bill }
    }

    pub fn bill(&self) -> &Bill {
        &self.bill
    }

    pub fn into_bill(self) -> Bill {
        self.bill
    }

    /// Returns `None` when the trimmed name is empty.
    pub fn add_person(&mut self, name: &str) -> Option<PersonId> {
        let name = non_empty_trimmed(name)?;
        let id = PersonId::new(Uuid::new_v4().to_string());
        self.bill.add_person(Person::new(id.clone(), name));
        Some(id)
    }

    pub fn rename_person(&mut self, id: &PersonId, name: &str) -> bool {
        match non_empty_trimmed(name) {
            Some(name) => self.bill.rename_person(id, name),
            None => false,
        }
    }

    pub fn remove_person(&mut self, id: &PersonId) -> bool {
        self.bill.remove_person(id).is_some()
    }

    pub fn add_item(&mut self, name: &str, price: Money) -> Option<ItemId> {
        let name = non_empty_trimmed(name)?;
        let id = ItemId::new(Uuid::new_v4().to_string());
        self.bill.add_item(Item::new(id.clone(), name, price));
        Some(id)
    }

    pub fn update_item(&mut self, id: &ItemId, mut changes: ItemChanges) -> bool {
        if let Some(name) = changes.name.take() {
            changes.name = Some(non_empty_trimmed(&name).unwrap_or(name));
        }
        self.bill.update_item(id, changes)
    }

    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        self.bill.remove_item(id).is_some()
    }

    pub fn set_assignment(&mut self, item_id: &ItemId, assignment: Assignment) -> bool {
        self.bill.set_assignment(item_id, assignment)
    }

    pub fn set_tip(&mut self, percent: Decimal, split: SplitMode) {
        self.bill.set_tip(percent, split);
    }

    pub fn set_tax(&mut self, tax: TaxMode, split: SplitMode) {
        self.bill.set_tax(tax, split);
    }

    pub fn results(&self) -> BillResults {
        self.bill.results()
    }

    pub fn itemized_breakdown(&self) -> Vec<PersonItemizedBreakdown> {
        self.bill.itemized_breakdown()
    }
}

fn non_empty_trimmed(name: &str) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn add_person_trims_and_assigns_unique_ids() {
        let mut session = BillSession::new();
        let alice = session.add_person("  Alice ").expect("person added");
        let bob = session.add_person("Bob").expect("person added");

        assert_ne!(alice, bob);
        let names: Vec<&str> = session
            .bill()
            .people()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("   ")]
    fn blank_names_are_rejected(#[case] name: &str) {
        let mut session = BillSession::new();
        assert_eq!(session.add_person(name), None);
        assert_eq!(session.add_item(name, Money::from_i64(100)), None);
        assert!(session.bill().people().is_empty());
        assert!(session.bill().items().is_empty());
    }

    #[test]
    fn edits_flow_into_results() {
        let mut session = BillSession::new();
        let alice = session.add_person("Alice").expect("person added");
        let bob = session.add_person("Bob").expect("person added");
        let pizza = session
            .add_item("Pizza", Money::from_i64(1200))
            .expect("item added");
        assert!(session.set_assignment(
            &pizza,
            Assignment::Equal {
                person_ids: vec![alice.clone(), bob.clone()],
            },
        ));

        let subtotals: Vec<i64> = session
            .results()
            .per_person
            .iter()
            .map(|p| p.subtotal.amount())
            .collect();
        assert_eq!(subtotals, [600, 600]);

        assert!(session.remove_person(&alice));
        assert_eq!(
            session.bill().assignments().get(&pizza),
            &Assignment::Equal {
                person_ids: vec![bob],
            }
        );
        assert_eq!(session.results().per_person[0].subtotal, Money::from_i64(1200));
    }

    #[test]
    fn update_item_trims_new_name() {
        let mut session = BillSession::new();
        let id = session
            .add_item("Soup", Money::from_i64(500))
            .expect("item added");
        assert!(session.update_item(
            &id,
            ItemChanges {
                name: Some(" Stew ".to_owned()),
                price: None,
            },
        ));
        let item = session.bill().item(&id).expect("item exists");
        assert_eq!(item.name, "Stew");
        assert_eq!(item.price, Money::from_i64(500));
    }
}
