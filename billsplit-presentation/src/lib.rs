#![warn(clippy::uninlined_format_args)]

pub mod error_presenter;
pub mod history_presenter;
pub mod summary_presenter;

pub use error_presenter::{format_history_error, format_script_error};
pub use history_presenter::HistoryPresenter;
pub use summary_presenter::SummaryPresenter;
