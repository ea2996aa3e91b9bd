//! Parses user text into bot commands or answers.

/// One user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Begin a dialogue, discarding any unfinished one.
    Start,
    /// Abort the current dialogue.
    Cancel,
    Help,
    /// Stop the bot. Only honoured on the local CLI.
    Quit,
    /// A slash command the bot does not know, e.g. `/settings`.
    Unknown(String),
    /// Anything else: the answer to the current question.
    Answer(String),
}

impl Command {
    /// Parse message content into a Command.
    ///
    /// Telegram appends the bot's username in groups (`/start@keyword_bot`);
    /// that suffix is ignored.
    pub fn parse(content: &str) -> Self {
        let trimmed = content.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Answer(trimmed.to_string());
        };

        let word = rest.split_whitespace().next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default().to_lowercase();

        match name.as_str() {
            "start" => Self::Start,
            "cancel" => Self::Cancel,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(word.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("/cancel"), Command::Cancel);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/?"), Command::Help);
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("/exit"), Command::Quit);
    }

    #[test]
    fn commands_are_case_insensitive_and_trimmed() {
        assert_eq!(Command::parse("  /START "), Command::Start);
        assert_eq!(Command::parse("/Cancel"), Command::Cancel);
    }

    #[test]
    fn bot_username_suffix_is_ignored() {
        assert_eq!(Command::parse("/start@keyword_bot"), Command::Start);
        assert_eq!(Command::parse("/cancel@keyword_bot now"), Command::Cancel);
    }

    #[test]
    fn other_text_is_an_answer() {
        assert_eq!(Command::parse(" Bakery "), Command::Answer("Bakery".into()));
        assert_eq!(
            Command::parse("https://bakery.example"),
            Command::Answer("https://bakery.example".into())
        );
    }

    #[test]
    fn unrecognised_slash_command_is_not_an_answer() {
        assert_eq!(
            Command::parse("/settings now"),
            Command::Unknown("settings".into())
        );
        assert_eq!(Command::parse("/"), Command::Unknown(String::new()));
    }
}
