//! Main bot loop: routes channel messages through the keyword dialogue.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use crate::channels::{ChannelManager, IncomingMessage, OutgoingResponse, StatusUpdate};
use crate::config::BotConfig;
use crate::error::Error;
use crate::keywords::KeywordPipeline;

use super::command::Command;
use super::model::BusinessProfile;
use super::prompts;
use super::session::{SessionManager, Step};

/// How often idle sessions are swept.
const PRUNE_INTERVAL: Duration = Duration::from_secs(600);

/// Channel allowed to stop the bot with `/quit`.
const CONSOLE_CHANNEL: &str = "cli";

/// Drives one keyword dialogue per user across all channels.
pub struct KeywordBot {
    config: BotConfig,
    pipeline: KeywordPipeline,
    channels: Arc<ChannelManager>,
    sessions: Arc<SessionManager>,
}

impl KeywordBot {
    pub fn new(config: BotConfig, pipeline: KeywordPipeline, channels: ChannelManager) -> Self {
        Self {
            config,
            pipeline,
            channels: Arc::new(channels),
            sessions: Arc::new(SessionManager::new()),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Run until Ctrl+C, `/quit` on the console, or every channel closes.
    pub async fn run(self) -> Result<(), Error> {
        let mut message_stream = self.channels.start_all().await?;

        // Spawn session pruning task
        let sessions = Arc::clone(&self.sessions);
        let idle_timeout = self.config.session_idle_timeout;
        let pruning_handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(PRUNE_INTERVAL);
            interval.tick().await; // Skip immediate first tick
            loop {
                interval.tick().await;
                sessions.prune_stale_sessions(idle_timeout).await;
            }
        });

        tracing::info!("{} ready and listening", self.config.name);

        loop {
            let message = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received, shutting down...");
                    break;
                }
                msg = message_stream.next() => {
                    match msg {
                        Some(m) => m,
                        None => {
                            tracing::info!("All channel streams ended, shutting down...");
                            break;
                        }
                    }
                }
            };

            match self.handle_message(&message).await {
                Ok(Some(response)) => {
                    if let Err(e) = self
                        .channels
                        .respond(&message, OutgoingResponse::text(response))
                        .await
                    {
                        tracing::error!(channel = %message.channel, "Failed to send reply: {}", e);
                    }
                }
                Ok(None) => {
                    tracing::info!("Shutdown command received, exiting...");
                    break;
                }
                Err(e) => {
                    tracing::error!("Error handling message: {}", e);
                    if let Err(send_err) = self
                        .channels
                        .respond(&message, OutgoingResponse::text(format!("Error: {e}")))
                        .await
                    {
                        tracing::debug!(channel = %message.channel, "Error reply not delivered: {}", send_err);
                    }
                }
            }
        }

        tracing::info!("{} shutting down...", self.config.name);
        pruning_handle.abort();
        self.channels.shutdown_all().await?;

        Ok(())
    }

    /// Handle one user turn.
    ///
    /// Returns the reply text, or `None` when the bot should stop.
    pub async fn handle_message(&self, message: &IncomingMessage) -> Result<Option<String>, Error> {
        tracing::debug!(
            "Received message from {} on {} ({} chars)",
            message.user_id,
            message.channel,
            message.content.len()
        );

        let reply = match Command::parse(&message.content) {
            Command::Start => {
                self.sessions.start(&message.channel, &message.user_id).await;
                prompts::welcome()
            }
            Command::Cancel => self.cancel(message).await?,
            Command::Help => prompts::HELP.to_string(),
            Command::Quit if message.channel == CONSOLE_CHANNEL => return Ok(None),
            Command::Quit => prompts::HELP.to_string(),
            Command::Unknown(name) => prompts::unknown_command(&name),
            Command::Answer(text) => self.answer(message, &text).await?,
        };

        Ok(Some(reply))
    }

    async fn cancel(&self, message: &IncomingMessage) -> Result<String, Error> {
        let Some(session) = self.sessions.get(&message.channel, &message.user_id).await else {
            return Ok(prompts::START_HINT.to_string());
        };

        let result = session.lock().await.cancel();
        self.sessions.end(&message.channel, &message.user_id).await;
        result?;

        tracing::info!(channel = %message.channel, user = %message.user_id, "Dialogue cancelled");
        Ok(prompts::CANCELLED.to_string())
    }

    async fn answer(&self, message: &IncomingMessage, text: &str) -> Result<String, Error> {
        let Some(session) = self.sessions.get(&message.channel, &message.user_id).await else {
            return Ok(prompts::START_HINT.to_string());
        };

        // Release the session before any network work.
        let step = session.lock().await.answer(text);
        let step = match step {
            Ok(step) => step,
            Err(e) => {
                self.sessions.end(&message.channel, &message.user_id).await;
                return Err(e.into());
            }
        };

        match step {
            Step::Ask(question) => Ok(question.to_string()),
            Step::Complete(profile) => {
                self.sessions.end(&message.channel, &message.user_id).await;
                Ok(self.report(message, &profile).await)
            }
        }
    }

    async fn report(&self, message: &IncomingMessage, profile: &BusinessProfile) -> String {
        if profile.website.is_some() {
            if let Err(e) = self
                .channels
                .send_status(
                    &message.channel,
                    StatusUpdate::Thinking(prompts::CHECKING_WEBSITE.to_string()),
                    &message.metadata,
                )
                .await
            {
                tracing::debug!("Status update not delivered: {}", e);
            }
        }

        let keywords = self
            .pipeline
            .relevant_keywords(profile.seed_terms(), profile.website.as_deref())
            .await;

        tracing::info!(
            channel = %message.channel,
            user = %message.user_id,
            industry = %profile.industry,
            objective = %profile.objective,
            keywords = keywords.len(),
            "Dialogue completed"
        );

        prompts::keyword_report(profile, &keywords)
    }
}
