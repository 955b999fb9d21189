#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod history;
pub mod model;
pub mod ports;
pub mod session;

pub use error::{BillScriptError, HistoryError, StorageError};
pub use history::HistoryService;
pub use model::{SCHEMA_VERSION, SavedSplit};
pub use ports::{BillScriptParser, SplitRepository};
pub use session::BillSession;
