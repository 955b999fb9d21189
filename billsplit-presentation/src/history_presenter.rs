use std::fmt::Write as _;

use billsplit_application::SavedSplit;
use billsplit_i18n as i18n;

use crate::summary_presenter::dollars;

const SHORT_ID_LEN: usize = 8;

pub struct HistoryPresenter;

impl HistoryPresenter {
    /// One line per saved split: short id, save time, name and grand total.
    pub fn render(splits: &[SavedSplit]) -> String {
        if splits.is_empty() {
            return i18n::NO_SAVED_SPLITS.to_owned();
        }

        let mut reply = String::with_capacity(splits.len() * 64);
        for (index, split) in splits.iter().enumerate() {
            if index > 0 {
                reply.push('\n');
            }
            let _ = write!(
                reply,
                "{}  {}  {}  {}",
                short_id(&split.id),
                split.saved_at.format("%Y-%m-%d %H:%M UTC"),
                split.name,
                dollars(split.results().grand_total)
            );
        }
        reply
    }
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
