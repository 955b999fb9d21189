#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillScriptError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
    #[error("Undefined person '{name}' at line {line}")]
    UndefinedPerson { name: String, line: usize },
    #[error("Person '{name}' declared twice at line {line}")]
    DuplicatePerson { name: String, line: usize },
    #[error("Invalid percentage '{value}' at line {line}")]
    InvalidPercent { value: String, line: usize },
    #[error("Invalid weight '{value}' at line {line}")]
    InvalidWeight { value: String, line: usize },
    #[error("All custom weights are zero at line {line}")]
    EmptyCustomWeights { line: usize },
}

impl BillScriptError {
    pub fn line(&self) -> usize {
        match self {
            Self::SyntaxError { line, .. }
            | Self::UndefinedPerson { line, .. }
            | Self::DuplicatePerson { line, .. }
            | Self::InvalidPercent { line, .. }
            | Self::InvalidWeight { line, .. }
            | Self::EmptyCustomWeights { line } => *line,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed history data: {0}")]
    Format(String),
    #[error("Unsupported schema version {found} (expected {expected})")]
    UnsupportedSchemaVersion { found: u32, expected: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("No saved split matches '{0}'")]
    NotFound(String),
    #[error("'{0}' matches more than one saved split")]
    AmbiguousId(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
