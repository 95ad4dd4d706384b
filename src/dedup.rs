use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Deserialize;

use crate::diagnostics::{RecordWarning, Warning};
use crate::record::ChatRecord;
use crate::transcript::{self, truncate_chars};

/// Identifies a conversation: its opening text plus the user's first line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationKey(String);

/// How much of a transcript goes into its [`ConversationKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyPolicy {
    /// Leading characters of the transcript, enough to cover the character setup.
    pub prefix_chars: usize,
    /// Cap on the first user utterance when the assistant never answered it.
    pub utterance_limit: usize,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self { prefix_chars: 50, utterance_limit: 300 }
    }
}

impl KeyPolicy {
    /// Derives the conversation key from a transcript alone.
    pub fn key(&self, context: &str) -> (ConversationKey, Option<Warning>) {
        let prefix = truncate_chars(context, self.prefix_chars);
        match transcript::first_user_utterance(context, self.utterance_limit) {
            Some(utterance) => (ConversationKey(format!("{prefix}{utterance}")), None),
            None => (
                ConversationKey(prefix.to_owned()),
                Some(Warning::MissingUserTurn),
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct Deduplicated {
    /// One record per conversation, in order of each conversation's first appearance.
    pub records: Vec<ChatRecord>,
    /// Number of partial snapshots that were dropped.
    pub discarded: usize,
    pub warnings: Vec<RecordWarning>,
}

/// Keeps the most complete snapshot of every conversation.
///
/// A later snapshot replaces the kept one only when its transcript is strictly
/// longer, so among equally long snapshots the first one seen is kept.
pub fn deduplicate(records: Vec<ChatRecord>, policy: &KeyPolicy) -> Deduplicated {
    let total = records.len();
    let mut warnings = Vec::new();
    let mut conversations: IndexMap<ConversationKey, ChatRecord> = IndexMap::new();

    for (index, record) in records.into_iter().enumerate() {
        tracing::debug!("Processing record {}", index + 1);
        let (key, warning) = policy.key(&record.context);
        if let Some(warning) = warning {
            warnings.push(RecordWarning { record: index + 1, warning });
        }

        match conversations.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(record);
            }
            Entry::Occupied(mut entry) => {
                if record.context_len() > entry.get().context_len() {
                    entry.insert(record);
                }
            }
        }
    }

    let records: Vec<_> = conversations.into_values().collect();
    Deduplicated { discarded: total - records.len(), records, warnings }
}
