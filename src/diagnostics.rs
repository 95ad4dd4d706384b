/// Degraded-path conditions found while processing a record.
///
/// None of these stop the run; the record is passed on with best-effort
/// defaults and the warning is handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    #[error("could not find a user turn in the transcript; keying on the prefix alone")]
    MissingUserTurn,
    #[error("did not find a recognized system prompt in the instruction or transcript")]
    UnrecognizedTemplate,
    #[error("could not determine the character name; assistant labels left as is")]
    CharacterNameNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWarning {
    /// 1-based position of the record in the stage's input.
    pub record: usize,
    pub warning: Warning,
}

impl std::fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {}: {}", self.record, self.warning)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_record_warning_display() {
        let fixture = RecordWarning { record: 4, warning: Warning::UnrecognizedTemplate };
        let actual = fixture.to_string();
        let expected =
            "record 4: did not find a recognized system prompt in the instruction or transcript";
        assert_eq!(actual, expected);
    }
}
