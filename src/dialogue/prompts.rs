//! Bot replies.

use super::model::BusinessProfile;
use super::state::DialoguePhase;

pub const WELCOME: &str = "Welcome to the Keyword Bot! Let's get started.";

pub const CANCELLED: &str = "Operation cancelled. Type /start to restart.";

pub const START_HINT: &str = "Type /start to generate keywords for your business.";

pub const NO_KEYWORDS: &str = "No relevant keywords found.";

pub const HELP: &str = "\
I suggest search keywords for your business.

/start  - answer a few questions about your business
/cancel - stop the current conversation
/help   - show this message";

/// Status text shown while the website is being read.
pub const CHECKING_WEBSITE: &str = "Checking your website for keywords...";

/// Reply to a slash command the bot does not know.
pub fn unknown_command(name: &str) -> String {
    format!("Unknown command /{name}. Type /help to see what I can do.")
}

/// The question asked while the dialogue is in `phase`.
pub fn question(phase: DialoguePhase) -> Option<&'static str> {
    let text = match phase {
        DialoguePhase::Industry => "What industry is your business in?",
        DialoguePhase::Objective => {
            "What is your business objective (e.g., lead generation, sales)?"
        }
        DialoguePhase::Website => "Do you have a website? If yes, please share the URL.",
        DialoguePhase::SocialMedia => {
            "Do you have any social media platforms? If yes, share the URL(s)."
        }
        DialoguePhase::PpcCampaign => "Do you use PPC campaigns? (Yes/No)",
        DialoguePhase::Audience => {
            "Who are you trying to reach? (e.g., young adults, professionals, etc.)"
        }
        DialoguePhase::Location => "What location would you like to target?",
        DialoguePhase::Completed | DialoguePhase::Cancelled => return None,
    };
    Some(text)
}

/// Greeting plus the first question.
pub fn welcome() -> String {
    let first = question(DialoguePhase::Industry).unwrap_or_default();
    format!("{WELCOME}\n{first}")
}

/// Final reply listing the relevant keywords.
pub fn keyword_report(profile: &BusinessProfile, keywords: &[String]) -> String {
    let keywords = if keywords.is_empty() {
        NO_KEYWORDS.to_string()
    } else {
        keywords.join(", ")
    };
    format!(
        "Generated Keywords based on inputs:\nIndustry: {}\nObjective: {}\nRelevant Keywords: {}",
        profile.industry, profile.objective, keywords
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BusinessProfile {
        BusinessProfile {
            industry: "Bakery".into(),
            objective: "sales".into(),
            website: Some("https://bakery.example".into()),
            social_media: "none".into(),
            uses_ppc: false,
            audience: "families".into(),
            location: "Leeds".into(),
        }
    }

    #[test]
    fn every_question_phase_has_text() {
        for phase in DialoguePhase::QUESTIONS {
            assert!(question(phase).is_some(), "{phase} needs a question");
        }
        assert!(question(DialoguePhase::Completed).is_none());
        assert!(question(DialoguePhase::Cancelled).is_none());
    }

    #[test]
    fn welcome_asks_for_industry() {
        assert_eq!(
            welcome(),
            "Welcome to the Keyword Bot! Let's get started.\nWhat industry is your business in?"
        );
    }

    #[test]
    fn report_lists_keywords() {
        let report = keyword_report(&profile(), &["bakery".into(), "sale".into()]);
        assert_eq!(
            report,
            "Generated Keywords based on inputs:\nIndustry: Bakery\nObjective: sales\n\
             Relevant Keywords: bakery, sale"
        );
    }

    #[test]
    fn report_without_keywords() {
        let report = keyword_report(&profile(), &[]);
        assert!(report.ends_with("Relevant Keywords: No relevant keywords found."));
    }
}
