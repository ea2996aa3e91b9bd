//! Dialogue state machine: tracks which question the user is answering.

use serde::{Deserialize, Serialize};

/// The phases of the keyword dialogue.
///
/// Progresses linearly: Industry → Objective → Website → SocialMedia →
/// PpcCampaign → Audience → Location → Completed. Any unfinished phase may
/// move to Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    Industry,
    Objective,
    Website,
    SocialMedia,
    PpcCampaign,
    Audience,
    Location,
    Completed,
    Cancelled,
}

impl DialoguePhase {
    /// Phases that ask the user a question, in order.
    pub const QUESTIONS: [DialoguePhase; 7] = [
        Self::Industry,
        Self::Objective,
        Self::Website,
        Self::SocialMedia,
        Self::PpcCampaign,
        Self::Audience,
        Self::Location,
    ];

    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: DialoguePhase) -> bool {
        use DialoguePhase::*;
        if target == Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, target),
            (Industry, Objective)
                | (Objective, Website)
                | (Website, SocialMedia)
                | (SocialMedia, PpcCampaign)
                | (PpcCampaign, Audience)
                | (Audience, Location)
                | (Location, Completed)
        )
    }

    /// Whether the dialogue is over in this phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Get the next phase in the linear progression, if any.
    pub fn next(&self) -> Option<DialoguePhase> {
        use DialoguePhase::*;
        match self {
            Industry => Some(Objective),
            Objective => Some(Website),
            Website => Some(SocialMedia),
            SocialMedia => Some(PpcCampaign),
            PpcCampaign => Some(Audience),
            Audience => Some(Location),
            Location => Some(Completed),
            Completed | Cancelled => None,
        }
    }
}

impl Default for DialoguePhase {
    fn default() -> Self {
        Self::Industry
    }
}

impl std::fmt::Display for DialoguePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Industry => "industry",
            Self::Objective => "objective",
            Self::Website => "website",
            Self::SocialMedia => "social_media",
            Self::PpcCampaign => "ppc_campaign",
            Self::Audience => "audience",
            Self::Location => "location",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DialoguePhase; 9] = [
        DialoguePhase::Industry,
        DialoguePhase::Objective,
        DialoguePhase::Website,
        DialoguePhase::SocialMedia,
        DialoguePhase::PpcCampaign,
        DialoguePhase::Audience,
        DialoguePhase::Location,
        DialoguePhase::Completed,
        DialoguePhase::Cancelled,
    ];

    #[test]
    fn valid_transitions() {
        use DialoguePhase::*;
        let transitions = [
            (Industry, Objective),
            (Objective, Website),
            (Website, SocialMedia),
            (SocialMedia, PpcCampaign),
            (PpcCampaign, Audience),
            (Audience, Location),
            (Location, Completed),
        ];
        for (from, to) in transitions {
            assert!(
                from.can_transition_to(to),
                "{from} should transition to {to}"
            );
        }
    }

    #[test]
    fn invalid_transitions() {
        use DialoguePhase::*;
        // Skip phases
        assert!(!Industry.can_transition_to(Website));
        assert!(!Audience.can_transition_to(Completed));
        // Go backward
        assert!(!Objective.can_transition_to(Industry));
        // Self-transition
        assert!(!Website.can_transition_to(Website));
    }

    #[test]
    fn cancel_from_any_unfinished_phase() {
        for phase in DialoguePhase::QUESTIONS {
            assert!(
                phase.can_transition_to(DialoguePhase::Cancelled),
                "{phase} should be cancellable"
            );
        }
    }

    #[test]
    fn terminal_phases_go_nowhere() {
        use DialoguePhase::*;
        for from in [Completed, Cancelled] {
            assert!(from.is_terminal());
            assert!(from.next().is_none());
            for to in ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be rejected");
            }
        }
    }

    #[test]
    fn next_walks_all_phases() {
        let mut current = DialoguePhase::default();
        let mut visited = vec![current];
        while let Some(next) = current.next() {
            assert!(current.can_transition_to(next));
            visited.push(next);
            current = next;
        }
        assert_eq!(current, DialoguePhase::Completed);
        assert_eq!(&visited[..7], &DialoguePhase::QUESTIONS);
    }

    #[test]
    fn display_matches_serde() {
        for phase in ALL {
            let display = format!("{phase}");
            let json = serde_json::to_string(&phase).unwrap();
            // JSON wraps in quotes
            assert_eq!(
                format!("\"{display}\""),
                json,
                "Display and serde should match for {phase:?}"
            );
        }
    }
}
