//! Command parser - Turns raw message text into a `Command`
//!
//! Grammar: `<sigil><base> [<sub> [<rest>]]`. The base keyword is matched
//! case-insensitively; text with an unknown base is not ours and yields `None`.

use crate::domain::entities::Command;

/// Parses raw message text into commands
#[derive(Debug, Clone)]
pub struct CommandParser {
    sigil: String,
    keywords: Vec<String>,
}

impl CommandParser {
    pub fn new(sigil: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            sigil: sigil.into(),
            keywords: vec![keyword.into()],
        }
    }

    /// Accept an extra base keyword (e.g. a short alias)
    pub fn with_alias(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// The first configured keyword, used in usage texts
    pub fn keyword(&self) -> &str {
        self.keywords.first().map(String::as_str).unwrap_or_default()
    }

    /// Whether the text is addressed to a bot at all
    pub fn is_command(&self, text: &str) -> bool {
        !self.sigil.is_empty() && text.starts_with(&self.sigil)
    }

    /// Parse a command message. `None` for non-commands and foreign base commands.
    pub fn parse(&self, text: &str) -> Option<Command> {
        if !self.is_command(text) {
            return None;
        }
        let body = &text[self.sigil.len()..];

        let (base, tail) = split_first_word(body);
        if base.is_empty() || !self.keywords.iter().any(|k| k.eq_ignore_ascii_case(base)) {
            return None;
        }

        let (sub, rest) = split_first_word(tail.trim());
        let command = match sub.to_lowercase().as_str() {
            "" => Command::Unknown(String::new()),
            "help" => Command::Help,
            "start" => Command::start(rest.split_whitespace().next()),
            "leaderboard" => Command::Leaderboard,
            "latest" => Command::Latest,
            _ => Command::Unknown(sub.to_string()),
        };

        Some(command)
    }
}

/// Split on the first run of whitespace
fn split_first_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (s, ""),
    }
}
