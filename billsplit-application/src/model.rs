use billsplit_domain::{Bill, BillResults};
use chrono::{DateTime, Utc};

/// Version stamped on every saved split. Stored data with any other version is rejected.
pub const SCHEMA_VERSION: u32 = 1;

/// A named snapshot of a bill kept in the split history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedSplit {
    pub id: String,
    pub name: String,
    pub saved_at: DateTime<Utc>,
    pub schema_version: u32,
    pub bill: Bill,
}

impl SavedSplit {
    pub fn results(&self) -> BillResults {
        self.bill.results()
    }
}
