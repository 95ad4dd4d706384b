use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const INSTRUCTION: &str = "instruction";
const INPUT: &str = "input";
const CONTEXT: &str = "context";
const RESPONSE: &str = "response";

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` is not a string")]
    NotAString(&'static str),
}

/// One snapshot of a chat session as it appears in the log dump.
///
/// The whole source object is kept so that fields we don't interpret, and the
/// order of all keys, survive the round trip to the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ChatRecord {
    pub instruction: String,
    /// The transcript so far, one `label: utterance` line per turn.
    pub context: String,
    pub response: String,
    /// Source object in key order; the three typed fields hold `null` here
    /// until they are written back.
    fields: Map<String, Value>,
    /// Key the transcript was read from, `input` or `context`.
    #[serde(skip_deserializing)]
    context_key: &'static str,
}

impl ChatRecord {
    #[cfg(test)]
    pub fn new(
        instruction: impl Into<String>,
        context: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        let fields = [INSTRUCTION, INPUT, RESPONSE]
            .into_iter()
            .map(|key| (key.to_owned(), Value::Null))
            .collect();
        Self {
            instruction: instruction.into(),
            context: context.into(),
            response: response.into(),
            fields,
            context_key: INPUT,
        }
    }

    pub fn context_len(&self) -> usize {
        self.context.chars().count()
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &'static str) -> Result<String, RecordError> {
    match fields.get_mut(key).ok_or(RecordError::MissingField(key))?.take() {
        Value::String(text) => Ok(text),
        _ => Err(RecordError::NotAString(key)),
    }
}

impl TryFrom<Map<String, Value>> for ChatRecord {
    type Error = RecordError;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let context_key = if fields.contains_key(INPUT) { INPUT } else { CONTEXT };
        Ok(Self {
            instruction: take_string(&mut fields, INSTRUCTION)?,
            context: take_string(&mut fields, context_key)?,
            response: take_string(&mut fields, RESPONSE)?,
            fields,
            context_key,
        })
    }
}

impl From<ChatRecord> for Map<String, Value> {
    fn from(record: ChatRecord) -> Self {
        let mut fields = record.fields;
        fields.insert(INSTRUCTION.to_owned(), Value::String(record.instruction));
        fields.insert(record.context_key.to_owned(), Value::String(record.context));
        fields.insert(RESPONSE.to_owned(), Value::String(record.response));
        fields
    }
}

pub fn load_records(data: &[u8]) -> Result<Vec<ChatRecord>> {
    serde_json::from_slice(data).context("Failed to parse input as a JSON array of chat records")
}
