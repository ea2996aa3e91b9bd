//! ChannelManager: merges channel streams and routes replies back.

use std::collections::HashMap;

use futures::stream::{self, StreamExt};

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse, StatusUpdate};
use crate::error::ChannelError;

/// Owns every active channel.
#[derive(Default)]
pub struct ChannelManager {
    channels: HashMap<String, Box<dyn Channel>>,
}

impl ChannelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel. A channel with the same name is replaced.
    pub fn add(&mut self, channel: Box<dyn Channel>) {
        let name = channel.name().to_string();
        if self.channels.insert(name.clone(), channel).is_some() {
            tracing::warn!(channel = %name, "Replaced existing channel");
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Health-check and start every channel, then merge their streams.
    ///
    /// A channel that fails either step is logged and left out; it is an
    /// error only when none start.
    pub async fn start_all(&self) -> Result<MessageStream, ChannelError> {
        let mut streams = Vec::new();
        for (name, channel) in &self.channels {
            if let Err(e) = channel.health_check().await {
                tracing::error!(channel = %name, "Channel health check failed: {}", e);
                continue;
            }
            match channel.start().await {
                Ok(stream) => {
                    tracing::info!(channel = %name, "Channel started");
                    streams.push(stream);
                }
                Err(e) => tracing::error!(channel = %name, "Channel failed to start: {}", e),
            }
        }

        if streams.is_empty() {
            return Err(ChannelError::StartupFailed {
                name: "all".into(),
                reason: "no channel could be started".into(),
            });
        }

        Ok(Box::pin(stream::select_all(streams)))
    }

    fn channel(&self, name: &str) -> Result<&dyn Channel, ChannelError> {
        self.channels
            .get(name)
            .map(|c| c.as_ref())
            .ok_or_else(|| ChannelError::UnknownChannel { name: name.into() })
    }

    /// Reply on the channel the message arrived on.
    pub async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        self.channel(&msg.channel)?.respond(msg, response).await
    }

    pub async fn send_status(
        &self,
        channel: &str,
        status: StatusUpdate,
        metadata: &serde_json::Value,
    ) -> Result<(), ChannelError> {
        self.channel(channel)?.send_status(status, metadata).await
    }

    pub async fn shutdown_all(&self) -> Result<(), ChannelError> {
        for (name, channel) in &self.channels {
            if let Err(e) = channel.shutdown().await {
                tracing::warn!(channel = %name, "Channel shutdown failed: {}", e);
            }
        }
        Ok(())
    }
}
