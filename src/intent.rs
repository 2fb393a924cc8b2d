//! Classifies the text addressed to the bot into a capability intent.

use strum::Display;

/// Trigger words that route a prompt to image generation.
const IMAGE_TRIGGERS: &[&str] = &["imagine", "generate", "image"];

/// Trigger words that route a prompt to speech synthesis.
const SPEECH_TRIGGERS: &[&str] = &["say"];

/// The capability a prompt asks for, with the cleaned argument text.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Intent {
    Image(String),
    Speech(String),
    Chat(String),
}

impl Intent {
    /// Classify a non-empty prompt by case-insensitive prefix match.
    ///
    /// A trigger only matches as a whole leading word: it must be followed by
    /// whitespace or end of input. Anything that matches no trigger is a chat
    /// request carrying the full prompt.
    pub fn classify(prompt: &str) -> Intent {
        if let Some(argument) = strip_trigger(prompt, IMAGE_TRIGGERS) {
            return Intent::Image(argument);
        }
        if let Some(argument) = strip_trigger(prompt, SPEECH_TRIGGERS) {
            return Intent::Speech(argument);
        }
        Intent::Chat(prompt.to_string())
    }
}

/// Match one of `triggers` at the start of `prompt` and cut it by the matched
/// trigger's actual length, plus the one whitespace run that follows it.
fn strip_trigger(prompt: &str, triggers: &[&str]) -> Option<String> {
    for trigger in triggers {
        let Some(head) = prompt.get(..trigger.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(trigger) {
            continue;
        }
        let rest = &prompt[trigger.len()..];
        if rest.is_empty() {
            return Some(String::new());
        }
        if rest.starts_with(char::is_whitespace) {
            return Some(rest.trim_start().to_string());
        }
    }
    None
}
