mod labels;
mod turns;

pub use labels::label_counts;
pub use turns::first_user_utterance;
pub(crate) use turns::truncate_chars;

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// The literal label that opens one of this speaker's turns.
    pub fn marker(self) -> &'static str {
        match self {
            Speaker::User => "user:",
            Speaker::Assistant => "assistant:",
        }
    }
}

/// Where a labelled turn starts inside a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    /// Byte range of the `label:` marker in the source text.
    pub marker: Range<usize>,
}
