//! Business profile collected over one dialogue.

use serde::{Deserialize, Serialize};

use crate::error::DialogueError;

use super::state::DialoguePhase;

/// Everything the user told the bot, fixed once the last question is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub industry: String,
    pub objective: String,
    /// Only set when the user answered with something that looks like a URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub social_media: String,
    pub uses_ppc: bool,
    pub audience: String,
    pub location: String,
}

impl BusinessProfile {
    /// Terms keyword expansion starts from.
    pub fn seed_terms(&self) -> [&str; 2] {
        [&self.industry, &self.objective]
    }
}

/// Answers gathered so far.
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    industry: Option<String>,
    objective: Option<String>,
    website: Option<String>,
    website_answered: bool,
    social_media: Option<String>,
    uses_ppc: Option<bool>,
    audience: Option<String>,
    location: Option<String>,
}

impl ProfileDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the answer to the question asked in `phase`.
    pub fn record(&mut self, phase: DialoguePhase, answer: &str) -> Result<(), DialogueError> {
        let answer = answer.trim();
        match phase {
            DialoguePhase::Industry => self.industry = Some(answer.to_string()),
            DialoguePhase::Objective => self.objective = Some(answer.to_string()),
            DialoguePhase::Website => {
                self.website = parse_website(answer);
                self.website_answered = true;
            }
            DialoguePhase::SocialMedia => self.social_media = Some(answer.to_string()),
            DialoguePhase::PpcCampaign => self.uses_ppc = Some(parse_yes(answer)),
            DialoguePhase::Audience => self.audience = Some(answer.to_string()),
            DialoguePhase::Location => self.location = Some(answer.to_string()),
            DialoguePhase::Completed | DialoguePhase::Cancelled => {
                return Err(DialogueError::AlreadyFinished { phase });
            }
        }
        Ok(())
    }

    /// Freeze the draft. Every question must have been answered.
    pub fn finish(self) -> Result<BusinessProfile, DialogueError> {
        if !self.website_answered {
            return Err(DialogueError::MissingAnswer { field: "website" });
        }
        Ok(BusinessProfile {
            industry: required(self.industry, "industry")?,
            objective: required(self.objective, "objective")?,
            website: self.website,
            social_media: required(self.social_media, "social_media")?,
            uses_ppc: required(self.uses_ppc, "ppc_campaign")?,
            audience: required(self.audience, "audience")?,
            location: required(self.location, "location")?,
        })
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, DialogueError> {
    value.ok_or(DialogueError::MissingAnswer { field })
}

/// The website answer is kept only when it starts with `http`.
pub fn parse_website(answer: &str) -> Option<String> {
    let answer = answer.trim();
    answer.starts_with("http").then(|| answer.to_string())
}

/// `yes` in any letter case; everything else is a no.
pub fn parse_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_all(draft: &mut ProfileDraft, website: &str, ppc: &str) {
        let answers = [
            "Bakery",
            "sales",
            website,
            "instagram.com/bakery",
            ppc,
            "families",
            "Leeds",
        ];
        for (phase, answer) in DialoguePhase::QUESTIONS.into_iter().zip(answers) {
            draft.record(phase, answer).unwrap();
        }
    }

    #[test]
    fn website_requires_http_prefix() {
        assert_eq!(
            parse_website("https://bakery.example"),
            Some("https://bakery.example".to_string())
        );
        assert_eq!(parse_website("  http://x.test "), Some("http://x.test".to_string()));
        assert_eq!(parse_website("no"), None);
        assert_eq!(parse_website("www.bakery.example"), None);
        assert_eq!(parse_website(""), None);
    }

    #[test]
    fn ppc_is_yes_case_insensitively() {
        assert!(parse_yes("yes"));
        assert!(parse_yes("YES"));
        assert!(parse_yes(" Yes "));
        assert!(!parse_yes("y"));
        assert!(!parse_yes("no"));
        assert!(!parse_yes("yes please"));
    }

    #[test]
    fn finish_builds_profile() {
        let mut draft = ProfileDraft::new();
        answer_all(&mut draft, "https://bakery.example", "Yes");
        let profile = draft.finish().unwrap();

        assert_eq!(profile.industry, "Bakery");
        assert_eq!(profile.objective, "sales");
        assert_eq!(profile.website.as_deref(), Some("https://bakery.example"));
        assert!(profile.uses_ppc);
        assert_eq!(profile.location, "Leeds");
        assert_eq!(profile.seed_terms(), ["Bakery", "sales"]);
    }

    #[test]
    fn website_answered_no_is_still_complete() {
        let mut draft = ProfileDraft::new();
        answer_all(&mut draft, "no", "no");
        let profile = draft.finish().unwrap();
        assert!(profile.website.is_none());
        assert!(!profile.uses_ppc);
    }

    #[test]
    fn unanswered_question_is_reported() {
        let mut draft = ProfileDraft::new();
        draft.record(DialoguePhase::Industry, "Bakery").unwrap();
        draft.record(DialoguePhase::Website, "no").unwrap();
        let err = draft.finish().unwrap_err();
        assert!(matches!(err, DialogueError::MissingAnswer { field: "objective" }));
    }

    #[test]
    fn terminal_phase_takes_no_answers() {
        let mut draft = ProfileDraft::new();
        let err = draft.record(DialoguePhase::Completed, "late").unwrap_err();
        assert!(matches!(err, DialogueError::AlreadyFinished { .. }));
    }

    #[test]
    fn profile_serializes_without_missing_website() {
        let mut draft = ProfileDraft::new();
        answer_all(&mut draft, "none", "no");
        let json = serde_json::to_value(draft.finish().unwrap()).unwrap();
        assert!(json.get("website").is_none());
        assert_eq!(json["uses_ppc"], false);
    }
}
