use crate::{
    error::{BillScriptError, StorageError},
    model::SavedSplit,
};
use billsplit_domain::Bill;

/// Turns a plain-text bill script into a bill.
pub trait BillScriptParser {
    fn parse(&self, content: &str) -> Result<Bill, BillScriptError>;
}

/// Whole-list storage for saved splits, newest first.
pub trait SplitRepository {
    fn load_all(&self) -> Result<Vec<SavedSplit>, StorageError>;
    fn save_all(&self, splits: &[SavedSplit]) -> Result<(), StorageError>;
}
