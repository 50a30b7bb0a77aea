//! Discord adapter (serenity).
//!
//! This crate implements the `rtb-core` ChatPort over the Discord HTTP API and
//! feeds gateway events into the core bot.

use std::sync::Arc;

use async_trait::async_trait;

use serenity::{
    builder::CreateMessage,
    cache::Cache,
    http::{Http, HttpError},
    model::{
        channel::{Channel, ReactionType},
        id,
    },
};

pub mod handlers;
pub mod router;

use handlers::convert::{emoji_symbol, parse_channel_id, parse_message_id};
use rtb_core::{
    domain::{ChannelId, MessageRef, UserId},
    errors::Error,
    messaging::{port::ChatPort, types::FetchedMessage},
    Result,
};

/// How a Discord call failed, as far as retrying is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FailureKind {
    /// Discord answered with this HTTP status.
    Status(u16),
    /// The connection was never established; the request was not sent.
    Connect,
    /// Transport failure after the request may have been sent (timeouts etc).
    Transport,
    Other,
}

impl FailureKind {
    fn of(e: &serenity::Error) -> Self {
        match e {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => {
                FailureKind::Status(resp.status_code.as_u16())
            }
            serenity::Error::Http(HttpError::Request(req)) if req.is_connect() => {
                FailureKind::Connect
            }
            serenity::Error::Http(HttpError::Request(_)) => FailureKind::Transport,
            _ => FailureKind::Other,
        }
    }

    /// A request Discord may already have applied is never retried, otherwise
    /// a timed-out reply could be posted twice.
    fn is_retryable(self) -> bool {
        match self {
            FailureKind::Status(code) => (500..600).contains(&code),
            FailureKind::Connect => true,
            FailureKind::Transport | FailureKind::Other => false,
        }
    }
}

#[derive(Clone)]
pub struct DiscordChat {
    http: Arc<Http>,
    cache: Option<Arc<Cache>>,
    self_id: UserId,
}

impl DiscordChat {
    pub fn new(http: Arc<Http>, cache: Option<Arc<Cache>>, self_id: UserId) -> Self {
        Self {
            http,
            cache,
            self_id,
        }
    }

    fn map_err(e: serenity::Error) -> Error {
        let kind = FailureKind::of(&e);
        if kind.is_retryable() {
            Error::Transient(format!("discord error: {e}"))
        } else {
            Error::External(format!("discord error: {e}"))
        }
    }

    fn cached_channel_name(&self, channel_id: id::ChannelId) -> Option<String> {
        let cache = self.cache.as_ref()?;
        let channel = cache.channel(channel_id)?;
        Some(channel.name.clone())
    }
}

#[async_trait]
impl ChatPort for DiscordChat {
    fn self_id(&self) -> UserId {
        self.self_id.clone()
    }

    async fn fetch_message(&self, msg: &MessageRef) -> Result<FetchedMessage> {
        let message = self
            .http
            .get_message(
                parse_channel_id(&msg.channel_id)?,
                parse_message_id(&msg.message_id)?,
            )
            .await
            .map_err(Self::map_err)?;

        Ok(FetchedMessage {
            author_id: UserId(message.author.id.get().to_string()),
            reactions: message
                .reactions
                .iter()
                .filter_map(|r| emoji_symbol(&r.reaction_type))
                .collect(),
        })
    }

    async fn channel_name(&self, channel_id: &ChannelId) -> Result<String> {
        let cid = parse_channel_id(channel_id)?;
        if let Some(name) = self.cached_channel_name(cid) {
            return Ok(name);
        }

        let channel = self
            .http
            .get_channel(cid)
            .await
            .map_err(Self::map_err)?;

        let name = match channel {
            Channel::Guild(c) => c.name,
            Channel::Private(c) => c.name(),
            _ => channel_id.0.clone(),
        };
        Ok(name)
    }

    async fn reply(&self, msg: &MessageRef, text: &str) -> Result<()> {
        let channel_id = parse_channel_id(&msg.channel_id)?;
        let message_id = parse_message_id(&msg.message_id)?;

        let builder = CreateMessage::new()
            .content(text)
            .reference_message((channel_id, message_id));
        channel_id
            .send_message(&self.http, builder)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn react(&self, msg: &MessageRef, emoji: &str) -> Result<()> {
        self.http
            .create_reaction(
                parse_channel_id(&msg.channel_id)?,
                parse_message_id(&msg.message_id)?,
                &ReactionType::Unicode(emoji.to_string()),
            )
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}
