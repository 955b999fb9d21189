#![warn(clippy::uninlined_format_args)]

pub mod parser;
pub mod repository;

pub use parser::ScriptBillParser;
pub use repository::JsonFileSplitRepository;
