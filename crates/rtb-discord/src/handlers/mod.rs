//! Gateway event handlers.
//!
//! Each handler converts the serenity event into a core event and hands it to
//! a `TallyBot` bound to the current context's HTTP client.

use std::sync::Arc;

use serenity::{
    async_trait,
    client::{Context, EventHandler},
    model::{
        channel::{Message, Reaction},
        gateway::Ready,
    },
};

use rtb_core::{
    bot::TallyBot,
    config::Config,
    messaging::{
        port::ChatPort,
        retry::{RetryConfig, RetryingChat},
        types::IncomingEvent,
    },
    scoreboard::Scoreboard,
};

use crate::DiscordChat;

pub mod convert;

pub struct Handler {
    cfg: Arc<Config>,
    scoreboard: Arc<Scoreboard>,
    retry: RetryConfig,
}

impl Handler {
    pub fn new(cfg: Arc<Config>, scoreboard: Arc<Scoreboard>, retry: RetryConfig) -> Self {
        Self {
            cfg,
            scoreboard,
            retry,
        }
    }

    fn bot(&self, ctx: &Context) -> TallyBot {
        let self_id = convert::user_id(ctx.cache.current_user().id);
        let raw: Arc<dyn ChatPort> = Arc::new(DiscordChat::new(
            ctx.http.clone(),
            Some(ctx.cache.clone()),
            self_id,
        ));
        let chat: Arc<dyn ChatPort> = Arc::new(RetryingChat::new(raw, self.retry));
        TallyBot::new(self.cfg.clone(), self.scoreboard.clone(), chat)
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Bot is now running. Press CTRL-C to exit."
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let event = IncomingEvent::MessageCreated(convert::new_message(&msg));
        self.bot(&ctx).handle(event).await;
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        let Some(added) = convert::reaction_added(&reaction) else {
            tracing::debug!(message_id = %reaction.message_id, "reaction without emoji name, ignored");
            return;
        };
        self.bot(&ctx)
            .handle(IncomingEvent::ReactionAdded(added))
            .await;
    }
}
