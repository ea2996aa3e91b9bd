//! Console channel: one local user answering the keyword questions on stdin.

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse, StatusUpdate};
use crate::dialogue::{DialoguePhase, prompts};
use crate::error::ChannelError;

/// User id every console turn is attributed to.
pub const CLI_USER_ID: &str = "local-user";

const IDLE_PROMPT: &str = "keyword-bot> ";

#[derive(Default)]
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }
}

/// Prompt to show after `reply`.
///
/// While a question is pending the prompt shows progress through the
/// questionnaire, e.g. `[3/7] > ` after the website question.
pub fn prompt_after(reply: &str) -> String {
    let asked = DialoguePhase::QUESTIONS
        .iter()
        .position(|&phase| prompts::question(phase).is_some_and(|q| reply.trim_end().ends_with(q)));

    match asked {
        Some(index) => format!("[{}/{}] > ", index + 1, DialoguePhase::QUESTIONS.len()),
        None => IDLE_PROMPT.to_string(),
    }
}

/// Next non-blank line from stdin, or `None` at EOF or on a read error.
async fn next_turn(lines: &mut Lines<BufReader<Stdin>>) -> Option<IncomingMessage> {
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => eprint!("{IDLE_PROMPT}"),
            Ok(Some(line)) => return Some(IncomingMessage::new("cli", CLI_USER_ID, line.trim())),
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Console input closed: {}", e);
                return None;
            }
        }
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        eprintln!("{}", prompts::START_HINT);
        eprint!("{IDLE_PROMPT}");

        let lines = BufReader::new(tokio::io::stdin()).lines();
        let turns = stream::unfold(lines, |mut lines| async move {
            next_turn(&mut lines).await.map(|msg| (msg, lines))
        });

        Ok(Box::pin(turns))
    }

    async fn respond(
        &self,
        _msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        println!("{}", response.content);
        eprint!("{}", prompt_after(&response.content));
        Ok(())
    }

    async fn send_status(
        &self,
        status: StatusUpdate,
        _metadata: &serde_json::Value,
    ) -> Result<(), ChannelError> {
        let StatusUpdate::Thinking(note) = status;
        eprintln!("({note})");
        Ok(())
    }
}
