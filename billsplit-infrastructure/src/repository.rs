use std::{
    fs, io,
    path::{Path, PathBuf},
};

use billsplit_application::{SCHEMA_VERSION, SavedSplit, SplitRepository, StorageError};
use billsplit_domain::{
    Assignment, Assignments, Bill, BillConfig, Item, ItemId, Money, Person, PersonId, Portion,
    SplitMode, TaxMode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Keeps the split history in a single JSON file.
///
/// A missing file reads as an empty history. Writes go to a sibling temp file that is
/// renamed over the target, so a crash never leaves a half-written history behind.
pub struct JsonFileSplitRepository {
    path: PathBuf,
}

impl JsonFileSplitRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SplitRepository for JsonFileSplitRepository {
    fn load_all(&self) -> Result<Vec<SavedSplit>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No history file yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let probe: VersionProbe =
            serde_json::from_str(&content).map_err(|e| StorageError::Format(e.to_string()))?;
        check_version(probe.schema_version)?;

        let file: HistoryFile =
            serde_json::from_str(&content).map_err(|e| StorageError::Format(e.to_string()))?;
        file.saved_splits
            .into_iter()
            .map(SavedSplitRecord::into_saved_split)
            .collect()
    }

    fn save_all(&self, splits: &[SavedSplit]) -> Result<(), StorageError> {
        let file = HistoryFile {
            schema_version: SCHEMA_VERSION,
            saved_splits: splits.iter().map(SavedSplitRecord::from_saved_split).collect(),
        };
        let json =
            serde_json::to_string_pretty(&file).map_err(|e| StorageError::Format(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            count = splits.len(),
            "Wrote history file"
        );
        Ok(())
    }
}

fn check_version(found: u32) -> Result<(), StorageError> {
    if found == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(StorageError::UnsupportedSchemaVersion {
            found,
            expected: SCHEMA_VERSION,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionProbe {
    schema_version: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryFile {
    schema_version: u32,
    saved_splits: Vec<SavedSplitRecord>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedSplitRecord {
    id: String,
    name: String,
    saved_at: DateTime<Utc>,
    schema_version: u32,
    people: Vec<PersonRecord>,
    items: Vec<ItemRecord>,
    assignments: Vec<ItemAssignmentRecord>,
    tip_percent: Decimal,
    tip_split_mode: SplitModeRecord,
    tax: TaxRecord,
    tax_split_mode: SplitModeRecord,
}

#[derive(Serialize, Deserialize)]
struct PersonRecord {
    id: String,
    name: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: String,
    name: String,
    price_cents: i64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemAssignmentRecord {
    item_id: String,
    assignment: AssignmentRecord,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
enum AssignmentRecord {
    Unassigned,
    #[serde(rename_all = "camelCase")]
    Single { person_id: String },
    #[serde(rename_all = "camelCase")]
    Equal { person_ids: Vec<String> },
    Everyone,
    Custom { portions: Vec<PortionRecord> },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortionRecord {
    person_id: String,
    weight: Decimal,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SplitModeRecord {
    Equal,
    Proportional,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
enum TaxRecord {
    Amount { cents: i64 },
    Percent { percent: Decimal },
}

impl SavedSplitRecord {
    fn from_saved_split(split: &SavedSplit) -> Self {
        let bill = &split.bill;
        let config = bill.config();
        Self {
            id: split.id.clone(),
            name: split.name.clone(),
            saved_at: split.saved_at,
            schema_version: split.schema_version,
            people: bill
                .people()
                .iter()
                .map(|person| PersonRecord {
                    id: person.id.as_str().to_owned(),
                    name: person.name.clone(),
                })
                .collect(),
            items: bill
                .items()
                .iter()
                .map(|item| ItemRecord {
                    id: item.id.as_str().to_owned(),
                    name: item.name.clone(),
                    price_cents: item.price.amount(),
                })
                .collect(),
            assignments: bill
                .assignments()
                .iter()
                .map(|(item_id, assignment)| ItemAssignmentRecord {
                    item_id: item_id.as_str().to_owned(),
                    assignment: AssignmentRecord::from(assignment),
                })
                .collect(),
            tip_percent: config.tip_percent,
            tip_split_mode: config.tip_split.into(),
            tax: match config.tax {
                TaxMode::Amount(amount) => TaxRecord::Amount {
                    cents: amount.amount(),
                },
                TaxMode::Percent(percent) => TaxRecord::Percent { percent },
            },
            tax_split_mode: config.tax_split.into(),
        }
    }

    fn into_saved_split(self) -> Result<SavedSplit, StorageError> {
        check_version(self.schema_version)?;

        let people = self
            .people
            .into_iter()
            .map(|person| Person::new(PersonId::new(person.id), person.name))
            .collect();
        let items = self
            .items
            .into_iter()
            .map(|item| {
                Item::new(
                    ItemId::new(item.id),
                    item.name,
                    Money::from_i64(item.price_cents),
                )
            })
            .collect();
        let assignments: Assignments = self
            .assignments
            .into_iter()
            .map(|entry| (ItemId::new(entry.item_id), entry.assignment.into()))
            .collect();
        let config = BillConfig {
            tip_percent: self.tip_percent,
            tip_split: self.tip_split_mode.into(),
            tax: match self.tax {
                TaxRecord::Amount { cents } => TaxMode::Amount(Money::from_i64(cents)),
                TaxRecord::Percent { percent } => TaxMode::Percent(percent),
            },
            tax_split: self.tax_split_mode.into(),
        };

        Ok(SavedSplit {
            id: self.id,
            name: self.name,
            saved_at: self.saved_at,
            schema_version: self.schema_version,
            bill: Bill::from_parts(people, items, assignments, config),
        })
    }
}

impl From<&Assignment> for AssignmentRecord {
    fn from(assignment: &Assignment) -> Self {
        match assignment {
            Assignment::Unassigned => Self::Unassigned,
            Assignment::Single { person_id } => Self::Single {
                person_id: person_id.as_str().to_owned(),
            },
            Assignment::Equal { person_ids } => Self::Equal {
                person_ids: person_ids
                    .iter()
                    .map(|id| id.as_str().to_owned())
                    .collect(),
            },
            Assignment::Everyone => Self::Everyone,
            Assignment::Custom { portions } => Self::Custom {
                portions: portions
                    .iter()
                    .map(|portion| PortionRecord {
                        person_id: portion.person_id.as_str().to_owned(),
                        weight: portion.weight,
                    })
                    .collect(),
            },
        }
    }
}

impl From<AssignmentRecord> for Assignment {
    fn from(record: AssignmentRecord) -> Self {
        match record {
            AssignmentRecord::Unassigned => Self::Unassigned,
            AssignmentRecord::Single { person_id } => Self::Single {
                person_id: PersonId::new(person_id),
            },
            AssignmentRecord::Equal { person_ids } => Self::Equal {
                person_ids: person_ids.into_iter().map(PersonId::new).collect(),
            },
            AssignmentRecord::Everyone => Self::Everyone,
            AssignmentRecord::Custom { portions } => Self::Custom {
                portions: portions
                    .into_iter()
                    .map(|portion| Portion::new(PersonId::new(portion.person_id), portion.weight))
                    .collect(),
            },
        }
    }
}

impl From<SplitMode> for SplitModeRecord {
    fn from(mode: SplitMode) -> Self {
        match mode {
            SplitMode::Equal => Self::Equal,
            SplitMode::Proportional => Self::Proportional,
        }
    }
}

impl From<SplitModeRecord> for SplitMode {
    fn from(mode: SplitModeRecord) -> Self {
        match mode {
            SplitModeRecord::Equal => Self::Equal,
            SplitModeRecord::Proportional => Self::Proportional,
        }
    }
}
