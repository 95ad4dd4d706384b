use std::sync::LazyLock;

use regex::Regex;

use super::{Speaker, Turn};

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"user:|assistant:").expect("valid marker pattern"));

/// Finds every `user:`/`assistant:` marker in a transcript, in order.
///
/// Markers are found wherever they occur, not only at the start of a line.
/// A turn's text runs from its marker to the next one.
pub fn parse_turns(context: &str) -> Vec<Turn> {
    MARKER
        .find_iter(context)
        .map(|found| {
            let speaker = if found.as_str() == Speaker::User.marker() {
                Speaker::User
            } else {
                Speaker::Assistant
            };
            Turn { speaker, marker: found.range() }
        })
        .collect()
}

/// Returns the first thing the user said in the transcript.
///
/// The utterance spans from the first `user:` marker to the next `assistant:`
/// marker, so consecutive user turns are read as one. When the assistant never
/// replies, the rest of the text is cut to `limit` characters. `None` means the
/// transcript has no user turn at all.
pub fn first_user_utterance(context: &str, limit: usize) -> Option<&str> {
    let turns = parse_turns(context);
    let first_user = turns.iter().position(|turn| turn.speaker == Speaker::User)?;
    let start = turns[first_user].marker.end;

    let reply = turns[first_user + 1..]
        .iter()
        .find(|turn| turn.speaker == Speaker::Assistant);

    Some(match reply {
        Some(reply) => &context[start..reply.marker.start],
        None => truncate_chars(&context[start..], limit),
    })
}

pub(crate) fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
