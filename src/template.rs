use std::sync::LazyLock;

use regex::Regex;
use strum::{Display, EnumIter, IntoEnumIterator};

static FICTIONAL_CHAT_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(next reply in a fictional chat between\s+\w+\s+and\s+)You\b")
        .expect("valid placeholder pattern")
});

const FICTIONAL_CHAT_OPENING: &str = "Write ";
const FICTIONAL_CHAT_SEPARATOR: &str = "'s next reply in a fictional chat between ";

/// The system prompt phrasings we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum PromptTemplate {
    /// `Write <Name>'s next reply in a fictional chat between <Name> and <Other>.`
    #[strum(to_string = "fictional chat")]
    FictionalChat,
}

/// The two sides of a chat as named by a recognized prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatParticipants<'a> {
    pub character: &'a str,
    pub partner: &'a str,
}

impl PromptTemplate {
    /// Replaces the `You` placeholder in every match of this template with `User`.
    ///
    /// Returns `None` if the template does not occur in `text`.
    pub fn rewrite_placeholder(self, text: &str) -> Option<String> {
        match self {
            PromptTemplate::FictionalChat => {
                if !FICTIONAL_CHAT_PLACEHOLDER.is_match(text) {
                    return None;
                }
                Some(
                    FICTIONAL_CHAT_PLACEHOLDER
                        .replace_all(text, "${1}User")
                        .into_owned(),
                )
            }
        }
    }

    pub fn extract_names(self, text: &str) -> Option<ChatParticipants<'_>> {
        match self {
            PromptTemplate::FictionalChat => extract_fictional_chat_names(text),
        }
    }
}

/// Tries every known template in turn and returns the first rewrite.
pub fn rewrite_placeholder(text: &str) -> Option<(PromptTemplate, String)> {
    PromptTemplate::iter()
        .find_map(|template| Some((template, template.rewrite_placeholder(text)?)))
}

pub fn extract_names(text: &str) -> Option<(PromptTemplate, ChatParticipants<'_>)> {
    PromptTemplate::iter()
        .find_map(|template| Some((template, template.extract_names(text)?)))
}

// `regex` has no back-references, so the "same name twice" constraint is
// matched by hand: leftmost opening first, then the longest name on that line.
fn extract_fictional_chat_names(text: &str) -> Option<ChatParticipants<'_>> {
    text.match_indices(FICTIONAL_CHAT_OPENING)
        .find_map(|(start, _)| {
            let name_start = start + FICTIONAL_CHAT_OPENING.len();
            let line_end = text[name_start..]
                .find('\n')
                .map_or(text.len(), |offset| name_start + offset);
            let line = &text[name_start..line_end];

            let separators: Vec<usize> = line
                .match_indices(FICTIONAL_CHAT_SEPARATOR)
                .map(|(offset, _)| offset)
                .filter(|offset| *offset > 0)
                .collect();

            separators.into_iter().rev().find_map(|offset| {
                let character = &line[..offset];
                let rest = &text[name_start + offset + FICTIONAL_CHAT_SEPARATOR.len()..];
                let rest = rest.strip_prefix(character)?.strip_prefix(" and ")?;
                let partner = &rest[..rest.find('.')?];
                (!partner.is_empty()).then_some(ChatParticipants { character, partner })
            })
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ARIA_PROMPT: &str = "Write Aria's next reply in a fictional chat between Aria and You.";

    #[test]
    fn test_rewrite_placeholder_changes_only_you() {
        let actual = rewrite_placeholder(ARIA_PROMPT).map(|(_, text)| text);
        let expected =
            Some("Write Aria's next reply in a fictional chat between Aria and User.".to_string());
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_rewrite_placeholder_keeps_name_containing_you() {
        let fixture = "Write Youko's next reply in a fictional chat between Youko and You. Stay in character.";
        let actual = rewrite_placeholder(fixture).map(|(_, text)| text);
        let expected = Some(
            "Write Youko's next reply in a fictional chat between Youko and User. Stay in character."
                .to_string(),
        );
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_rewrite_placeholder_tolerates_extra_whitespace() {
        let fixture = "next reply in a fictional chat between  Aria\tand\nYou";
        let actual = rewrite_placeholder(fixture).map(|(_, text)| text);
        let expected = Some("next reply in a fictional chat between  Aria\tand\nUser".to_string());
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_rewrite_placeholder_rejects_longer_word() {
        let fixture = "next reply in a fictional chat between Aria and Yourself";
        assert_eq!(rewrite_placeholder(fixture), None);
    }

    #[test]
    fn test_rewrite_placeholder_is_idempotent() {
        let (_, once) = rewrite_placeholder(ARIA_PROMPT).unwrap();
        assert_eq!(rewrite_placeholder(&once), None);
    }

    #[test]
    fn test_rewrite_placeholder_no_template() {
        assert_eq!(rewrite_placeholder("You are a helpful assistant."), None);
    }

    #[test]
    fn test_extract_names_from_canonical_prompt() {
        let actual = extract_names(ARIA_PROMPT);
        let expected = Some((
            PromptTemplate::FictionalChat,
            ChatParticipants { character: "Aria", partner: "You" },
        ));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_extract_names_with_multi_word_name() {
        let fixture = "Write Lady Mary's next reply in a fictional chat between Lady Mary and Tom. Be vivid.";
        let actual = extract_names(fixture).map(|(_, names)| names);
        let expected = Some(ChatParticipants { character: "Lady Mary", partner: "Tom" });
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_extract_names_requires_same_name_twice() {
        let fixture = "Write Aria's next reply in a fictional chat between Bob and You.";
        assert_eq!(extract_names(fixture), None);
    }

    #[test]
    fn test_extract_names_requires_terminating_period() {
        let fixture = "Write Aria's next reply in a fictional chat between Aria and You";
        assert_eq!(extract_names(fixture), None);
    }

    #[test]
    fn test_extract_names_finds_prompt_inside_longer_text() {
        let fixture = "[System note]\nWrite Kai's next reply in a fictional chat between Kai and User.\nuser: hi";
        let actual = extract_names(fixture).map(|(_, names)| names);
        let expected = Some(ChatParticipants { character: "Kai", partner: "User" });
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_extract_names_skips_unmatched_earlier_opening() {
        let fixture = "Write something nice. Write Kai's next reply in a fictional chat between Kai and Sam.";
        let actual = extract_names(fixture).map(|(_, names)| names);
        let expected = Some(ChatParticipants { character: "Kai", partner: "Sam" });
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_template_display() {
        assert_eq!(PromptTemplate::FictionalChat.to_string(), "fictional chat");
    }
}
