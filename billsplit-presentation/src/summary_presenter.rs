use std::fmt::Write as _;

use billsplit_domain::{BillResults, Money, PersonItemizedBreakdown, PersonResult, SplitNote};
use billsplit_i18n as i18n;

/// Plain-text bill summaries for sharing.
pub struct SummaryPresenter;

impl SummaryPresenter {
    /// Per-person totals with their subtotal, tip and tax, then the grand total.
    pub fn render(results: &BillResults) -> String {
        let mut reply = String::with_capacity(256);
        push_title(&mut reply, i18n::SUMMARY_TITLE);
        reply.push('\n');

        for person in &results.per_person {
            let _ = writeln!(reply, "{}: {}", person.name, dollars(person.total));
            push_parts(&mut reply, person);
            reply.push('\n');
        }

        let _ = writeln!(reply, "{}", "-".repeat(width(i18n::SUMMARY_TITLE)));
        let _ = write!(reply, "{}: {}", i18n::GRAND_TOTAL, dollars(results.grand_total));
        reply
    }

    /// Each person's item shares with split notes, followed by their totals.
    ///
    /// `breakdown` is matched to `results.per_person` by person id; people missing from
    /// it are shown without items.
    pub fn render_detailed(results: &BillResults, breakdown: &[PersonItemizedBreakdown]) -> String {
        let mut reply = String::with_capacity(512);
        push_title(&mut reply, i18n::DETAILED_TITLE);
        reply.push('\n');

        for person in &results.per_person {
            let _ = writeln!(reply, "{}", person.name);
            let _ = writeln!(reply, "{}", "-".repeat(width(&person.name)));

            let items = breakdown
                .iter()
                .find(|entry| entry.person_id == person.person_id)
                .map(|entry| entry.items.as_slice())
                .unwrap_or_default();
            if items.is_empty() {
                let _ = writeln!(reply, "  {}", i18n::NO_ITEMS_ASSIGNED);
            }
            for item in items {
                let _ = write!(reply, "  {}: {}", item.item_name, dollars(item.their_share));
                if let Some(note) = item.split_note {
                    let _ = write!(reply, " ({})", split_note(note));
                }
                reply.push('\n');
            }

            push_parts(&mut reply, person);
            let _ = writeln!(reply, "  {}: {}", i18n::TOTAL, dollars(person.total));
            reply.push('\n');
        }

        let _ = writeln!(reply, "{}", "=".repeat(width(i18n::DETAILED_TITLE)));
        let _ = writeln!(reply, "{}: {}", i18n::GRAND_TOTAL, dollars(results.grand_total));
        if results.is_reconciled() {
            reply.push_str(i18n::RECONCILED);
        } else {
            reply.push_str(&i18n::reconciliation_failed(dollars(
                results.grand_total_check,
            )));
        }
        reply
    }
}

fn push_title(reply: &mut String, title: &str) {
    let _ = writeln!(reply, "{title}");
    let _ = writeln!(reply, "{}", "=".repeat(width(title)));
}

fn push_parts(reply: &mut String, person: &PersonResult) {
    let _ = writeln!(reply, "  {}: {}", i18n::SUBTOTAL, dollars(person.subtotal));
    let _ = writeln!(reply, "  {}: {}", i18n::TIP, dollars(person.tip));
    let _ = writeln!(reply, "  {}: {}", i18n::TAX, dollars(person.tax));
}

fn split_note(note: SplitNote) -> String {
    match note {
        SplitNote::Ways(count) => i18n::split_ways(count),
        SplitNote::Share { weight, total } => {
            i18n::weighted_share(weight.normalize(), total.normalize())
        }
    }
}

pub(crate) fn dollars(amount: Money) -> String {
    format!("${}", amount.to_decimal_string())
}

fn width(text: &str) -> usize {
    text.chars().count()
}
