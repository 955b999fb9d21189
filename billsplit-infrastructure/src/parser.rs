use std::str::FromStr;

use billsplit_application::{BillScriptError, BillScriptParser};
use billsplit_domain::{
    Assignment, Bill, Item, ItemId, Money, Person, PersonId, Portion, SplitMode, TaxMode,
    parse_decimal_to_cents,
};
use billsplit_parser::{
    ItemLine, ParseError, Recipient, Recipients, SplitKeyword, Statement, StatementWithLine,
    TaxValue, parse_program,
};
use fxhash::FxHashSet;
use rust_decimal::Decimal;

/// Builds a [`Bill`] from a bill script.
///
/// People are identified by their declared names and items get `item-<n>` ids in
/// declaration order. Every name referenced by an item must be declared on an earlier
/// `people:` line.
#[derive(Default)]
pub struct ScriptBillParser;

impl BillScriptParser for ScriptBillParser {
    fn parse(&self, content: &str) -> Result<Bill, BillScriptError> {
        let program = parse_program(content).map_err(|err| match err {
            ParseError::SyntaxError { line, detail } => {
                BillScriptError::SyntaxError { line, detail }
            }
        })?;

        let mut builder = BillBuilder::default();
        for StatementWithLine { line, statement } in program.statements {
            builder.apply(line, statement)?;
        }

        tracing::debug!(
            people = builder.bill.people().len(),
            items = builder.bill.items().len(),
            "Parsed bill script"
        );
        Ok(builder.bill)
    }
}

#[derive(Default)]
struct BillBuilder<'a> {
    bill: Bill,
    declared: FxHashSet<&'a str>,
    item_count: usize,
}

impl<'a> BillBuilder<'a> {
    fn apply(&mut self, line: usize, statement: Statement<'a>) -> Result<(), BillScriptError> {
        match statement {
            Statement::People(names) => {
                for name in names {
                    if !self.declared.insert(name) {
                        return Err(BillScriptError::DuplicatePerson {
                            name: name.to_owned(),
                            line,
                        });
                    }
                    self.bill.add_person(Person::new(name, name));
                }
            }
            Statement::Item(item) => self.add_item(line, item)?,
            Statement::Tip { percent, split } => {
                self.bill.set_tip(parse_percent(percent, line)?, split_mode(split));
            }
            Statement::Tax { value, split } => {
                let tax = match value {
                    TaxValue::Percent(percent) => TaxMode::Percent(parse_percent(percent, line)?),
                    TaxValue::Amount(amount) => TaxMode::Amount(parse_decimal_to_cents(amount)),
                };
                self.bill.set_tax(tax, split_mode(split));
            }
        }
        Ok(())
    }

    fn add_item(&mut self, line: usize, item: ItemLine<'a>) -> Result<(), BillScriptError> {
        let assignment = match item.recipients {
            None => None,
            Some(recipients) => Some(self.assignment(line, recipients)?),
        };

        self.item_count += 1;
        let id = ItemId::new(format!("item-{}", self.item_count));
        self.bill.add_item(Item::new(
            id.clone(),
            item.name,
            parse_decimal_to_cents(item.price),
        ));
        if let Some(assignment) = assignment {
            self.bill.set_assignment(&id, assignment);
        }
        Ok(())
    }

    fn assignment(
        &self,
        line: usize,
        recipients: Recipients<'a>,
    ) -> Result<Assignment, BillScriptError> {
        let listed = match recipients {
            Recipients::Everyone => return Ok(Assignment::Everyone),
            Recipients::Listed(listed) => listed,
        };

        for Recipient { name, .. } in &listed {
            if !self.declared.contains(name) {
                return Err(BillScriptError::UndefinedPerson {
                    name: (*name).to_owned(),
                    line,
                });
            }
        }

        // Any explicit weight makes the whole list weighted; bare names count as 1.
        if listed.iter().any(|recipient| recipient.weight.is_some()) {
            let portions = listed
                .iter()
                .map(|recipient| {
                    let weight = match recipient.weight {
                        Some(text) => parse_weight(text, line)?,
                        None => Decimal::ONE,
                    };
                    Ok(Portion::new(recipient.name, weight))
                })
                .collect::<Result<Vec<_>, BillScriptError>>()?;
            if portions.iter().all(|portion| portion.weight.is_zero()) {
                return Err(BillScriptError::EmptyCustomWeights { line });
            }
            return Ok(Assignment::Custom { portions });
        }

        match listed.as_slice() {
            [single] => Ok(Assignment::Single {
                person_id: PersonId::from(single.name),
            }),
            _ => Ok(Assignment::Equal {
                person_ids: listed
                    .iter()
                    .map(|recipient| PersonId::from(recipient.name))
                    .collect(),
            }),
        }
    }
}

fn split_mode(keyword: SplitKeyword) -> SplitMode {
    match keyword {
        SplitKeyword::Equal => SplitMode::Equal,
        SplitKeyword::Proportional => SplitMode::Proportional,
    }
}

fn parse_percent(text: &str, line: usize) -> Result<Decimal, BillScriptError> {
    Decimal::from_str(text).map_err(|_| BillScriptError::InvalidPercent {
        value: text.to_owned(),
        line,
    })
}

fn parse_weight(text: &str, line: usize) -> Result<Decimal, BillScriptError> {
    Decimal::from_str(text).map_err(|_| BillScriptError::InvalidWeight {
        value: text.to_owned(),
        line,
    })
}
