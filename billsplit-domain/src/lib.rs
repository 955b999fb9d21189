#![warn(clippy::uninlined_format_args)]

pub mod bill;
pub mod model;
pub mod money;
pub mod services;

pub use bill::{Bill, ItemChanges};
pub use model::{
    Assignment, Assignments, BillConfig, BillResults, Item, ItemId, Money, Person, PersonId,
    PersonItemizedBreakdown, PersonItemizedEntry, PersonResult, Portion, SplitMode, SplitNote,
    TaxMode,
};
pub use money::{format_cents_to_decimal, parse_decimal_to_cents};
pub use services::{
    AssignmentResolver, ItemizedBreakdownBuilder, Resolution, ResultsAggregator, Weights,
    compute_itemized_breakdown, compute_results, distribute,
};
