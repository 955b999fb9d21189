use billsplit_application::{BillScriptError, HistoryError};
use billsplit_i18n as i18n;

pub fn format_script_error(error: &BillScriptError) -> String {
    match error {
        BillScriptError::SyntaxError { line, detail } => {
            i18n::syntax_error(*line, detail.clone()).to_string()
        }
        BillScriptError::UndefinedPerson { name, line } => {
            i18n::at_line(*line, i18n::undefined_person(name)).to_string()
        }
        BillScriptError::DuplicatePerson { name, line } => {
            i18n::at_line(*line, i18n::duplicate_person(name)).to_string()
        }
        BillScriptError::InvalidPercent { value, line } => {
            i18n::at_line(*line, i18n::invalid_percent(value)).to_string()
        }
        BillScriptError::InvalidWeight { value, line } => {
            i18n::at_line(*line, i18n::invalid_weight(value)).to_string()
        }
        BillScriptError::EmptyCustomWeights { line } => {
            i18n::at_line(*line, i18n::empty_custom_weights()).to_string()
        }
    }
}

pub fn format_history_error(error: &HistoryError) -> String {
    match error {
        HistoryError::NotFound(id) => i18n::split_not_found(id),
        HistoryError::AmbiguousId(id) => i18n::ambiguous_split_id(id),
        HistoryError::Storage(source) => i18n::storage_failure(source),
    }
}

#[cfg(all(test, not(feature = "ja")))]
mod tests {
    use super::*;
    use billsplit_application::StorageError;
    use rstest::rstest;

    #[rstest]
    #[case::syntax(
        BillScriptError::SyntaxError { line: 4, detail: "unexpected input".to_owned() },
        "Syntax error at line 4: unexpected input"
    )]
    #[case::undefined_person(
        BillScriptError::UndefinedPerson { name: "Bob".to_owned(), line: 2 },
        "Undefined person 'Bob' (line 2)"
    )]
    #[case::duplicate_person(
        BillScriptError::DuplicatePerson { name: "Ann".to_owned(), line: 3 },
        "Person 'Ann' is declared twice (line 3)"
    )]
    #[case::invalid_percent(
        BillScriptError::InvalidPercent { value: "1e99".to_owned(), line: 7 },
        "Invalid percentage '1e99' (line 7)"
    )]
    #[case::invalid_weight(
        BillScriptError::InvalidWeight { value: "9x".to_owned(), line: 5 },
        "Invalid weight '9x' (line 5)"
    )]
    #[case::empty_weights(
        BillScriptError::EmptyCustomWeights { line: 6 },
        "All custom weights are zero (line 6)"
    )]
    fn script_errors_mention_their_line(#[case] error: BillScriptError, #[case] expected: &str) {
        assert_eq!(format_script_error(&error), expected);
    }

    #[rstest]
    #[case::not_found(
        HistoryError::NotFound("abc".to_owned()),
        "No saved split with id 'abc'"
    )]
    #[case::ambiguous(
        HistoryError::AmbiguousId("a".to_owned()),
        "'a' matches more than one saved split"
    )]
    #[case::unsupported_version(
        HistoryError::Storage(StorageError::UnsupportedSchemaVersion { found: 2, expected: 1 }),
        "Failed to access split history: Unsupported schema version 2 (expected 1)"
    )]
    fn history_errors(#[case] error: HistoryError, #[case] expected: &str) {
        assert_eq!(format_history_error(&error), expected);
    }
}
