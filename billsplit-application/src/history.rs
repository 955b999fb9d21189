use billsplit_domain::Bill;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::HistoryError,
    model::{SCHEMA_VERSION, SavedSplit},
    ports::SplitRepository,
};

/// Saves, lists, recalls and deletes named bill snapshots.
///
/// Splits are identified by their full id or by any prefix that matches exactly one of them.
pub struct HistoryService<R> {
    repository: R,
}

impl<R: SplitRepository> HistoryService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// All saved splits, newest first.
    pub fn list(&self) -> Result<Vec<SavedSplit>, HistoryError> {
        Ok(self.repository.load_all()?)
    }

    /// Stores a snapshot of `bill` in front of the existing history.
    pub fn save_split(&self, name: &str, bill: &Bill) -> Result<SavedSplit, HistoryError> {
        let mut splits = self.repository.load_all()?;
        let saved = SavedSplit {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_owned(),
            saved_at: Utc::now(),
            schema_version: SCHEMA_VERSION,
            bill: bill.clone(),
        };
        splits.insert(0, saved.clone());
        self.repository.save_all(&splits)?;

        tracing::info!(
            split_id = %saved.id,
            name = %saved.name,
            total = splits.len(),
            "Saved split"
        );
        Ok(saved)
    }

    pub fn find(&self, id: &str) -> Result<SavedSplit, HistoryError> {
        let splits = self.repository.load_all()?;
        let index = locate(&splits, id)?;
        Ok(splits[index].clone())
    }

    pub fn recall(&self, id: &str) -> Result<Bill, HistoryError> {
        self.find(id).map(|split| split.bill)
    }

    pub fn delete_split(&self, id: &str) -> Result<SavedSplit, HistoryError> {
        let mut splits = self.repository.load_all()?;
        let index = locate(&splits, id)?;
        let removed = splits.remove(index);
        self.repository.save_all(&splits)?;

        tracing::info!(split_id = %removed.id, remaining = splits.len(), "Deleted split");
        Ok(removed)
    }
}

fn locate(splits: &[SavedSplit], id: &str) -> Result<usize, HistoryError> {
    let id = id.trim();
    if let Some(index) = splits.iter().position(|split| split.id == id) {
        return Ok(index);
    }
    if id.is_empty() {
        return Err(HistoryError::NotFound(id.to_owned()));
    }

    let mut matches = splits
        .iter()
        .enumerate()
        .filter(|(_, split)| split.id.starts_with(id))
        .map(|(index, _)| index);
    match (matches.next(), matches.next()) {
        (Some(index), None) => Ok(index),
        (Some(_), Some(_)) => Err(HistoryError::AmbiguousId(id.to_owned())),
        (None, _) => Err(HistoryError::NotFound(id.to_owned())),
    }
}
