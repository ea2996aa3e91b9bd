//! The question-and-answer flow that collects a business profile and
//! replies with relevant keywords.

pub mod bot;
pub mod command;
pub mod model;
pub mod prompts;
pub mod session;
pub mod state;

pub use bot::KeywordBot;
pub use command::Command;
pub use model::{BusinessProfile, ProfileDraft};
pub use session::{DialogueSession, SessionManager, Step};
pub use state::DialoguePhase;
