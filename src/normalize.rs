use crate::diagnostics::{RecordWarning, Warning};
use crate::record::ChatRecord;
use crate::template;

const ASSISTANT_LABEL: &str = "\nassistant:";

/// Who the chat is between, as named by the recognized prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cast {
    pub character: String,
    pub partner: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: ChatRecord,
    /// Set when the prompt named the character, whose name replaced the
    /// generic assistant label.
    pub cast: Option<Cast>,
    /// How many `assistant:` labels were renamed.
    pub substitutions: usize,
    pub warnings: Vec<Warning>,
}

/// Rewrites the prompt placeholder and names the assistant's turns after the character.
///
/// The instruction is tried first and the transcript second, for both steps.
/// The response is never touched.
pub fn normalize(mut record: ChatRecord) -> Normalized {
    let mut warnings = Vec::new();

    if let Some((_, rewritten)) = template::rewrite_placeholder(&record.instruction) {
        record.instruction = rewritten;
    } else if let Some((_, rewritten)) = template::rewrite_placeholder(&record.context) {
        record.context = rewritten;
    } else {
        warnings.push(Warning::UnrecognizedTemplate);
    }

    let cast = find_cast(&record.instruction).or_else(|| find_cast(&record.context));

    let substitutions = match &cast {
        Some(cast) => {
            let count = record.context.matches(ASSISTANT_LABEL).count();
            record.context = record
                .context
                .replace(ASSISTANT_LABEL, &format!("\n{}:", cast.character));
            count
        }
        None => {
            warnings.push(Warning::CharacterNameNotFound);
            0
        }
    };

    Normalized { record, cast, substitutions, warnings }
}

fn find_cast(text: &str) -> Option<Cast> {
    let (prompt, names) = template::extract_names(text)?;
    tracing::debug!("{prompt} prompt names {}", names.character);
    Some(Cast {
        character: names.character.to_owned(),
        partner: names.partner.to_owned(),
    })
}

/// Normalizes every record, returning the warnings tagged with record numbers.
pub fn normalize_all(records: Vec<ChatRecord>) -> (Vec<Normalized>, Vec<RecordWarning>) {
    let normalized: Vec<_> = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            tracing::debug!("Applying post-processing to conversation {}", index + 1);
            normalize(record)
        })
        .collect();
    let warnings = normalized
        .iter()
        .enumerate()
        .flat_map(|(index, normalized)| {
            normalized
                .warnings
                .iter()
                .cloned()
                .map(move |warning| RecordWarning { record: index + 1, warning })
        })
        .collect();
    (normalized, warnings)
}
