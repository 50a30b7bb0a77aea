//! Event dispatch: routes chat events to the classifier, the command
//! interpreter and the scoreboard, and answers through the chat port.

use std::sync::Arc;

use crate::{
    classifier::classify,
    commands::{parse_command, Command},
    config::Config,
    domain::UserId,
    formatting::format_score,
    messaging::{
        port::ChatPort,
        types::{IncomingEvent, NewMessage, ReactionAdded},
    },
    scoreboard::Scoreboard,
};

pub const ACK_EMOJI: &str = "🆗";
pub const UNKNOWN_COMMAND_EMOJI: &str = "⁉️";
pub const PONG: &str = "pong";

#[derive(Clone)]
pub struct TallyBot {
    cfg: Arc<Config>,
    scoreboard: Arc<Scoreboard>,
    chat: Arc<dyn ChatPort>,
}

impl TallyBot {
    pub fn new(cfg: Arc<Config>, scoreboard: Arc<Scoreboard>, chat: Arc<dyn ChatPort>) -> Self {
        Self {
            cfg,
            scoreboard,
            chat,
        }
    }

    #[cfg(test)]
    pub(crate) fn scoreboard(&self) -> &Arc<Scoreboard> {
        &self.scoreboard
    }

    pub async fn handle(&self, event: IncomingEvent) {
        match event {
            IncomingEvent::MessageCreated(msg) => self.on_message(msg).await,
            IncomingEvent::ReactionAdded(reaction) => self.on_reaction(reaction).await,
        }
    }

    /// Commands first; anything else is only logged.
    pub async fn on_message(&self, msg: NewMessage) {
        if msg.author_id == self.chat.self_id() {
            return;
        }

        if let Some(cmd) = parse_command(&msg.content, &self.cfg.command_prefix) {
            self.run_command(&msg, cmd).await;
            return;
        }

        let channel = match self.chat.channel_name(&msg.message.channel_id).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(
                    channel_id = %msg.message.channel_id,
                    error = %e,
                    "channel lookup failed"
                );
                msg.message.channel_id.0.clone()
            }
        };
        tracing::info!("[{channel}] {}: {}", msg.author_name, msg.content);
    }

    async fn run_command(&self, msg: &NewMessage, cmd: Command) {
        tracing::debug!(?cmd, author = %msg.author_id, "command");

        match cmd {
            Command::Stats { target } => {
                let user = target.map(UserId).unwrap_or_else(|| msg.author_id.clone());
                let score = self.scoreboard.score(&user).await;
                let text = format_score(&score, self.cfg.ratings());
                self.reply(msg, &text).await;
            }
            Command::Ping => {
                self.react(msg, ACK_EMOJI).await;
                self.reply(msg, PONG).await;
            }
            Command::Unknown => self.react(msg, UNKNOWN_COMMAND_EMOJI).await,
        }
    }

    async fn reply(&self, msg: &NewMessage, text: &str) {
        if let Err(e) = self.chat.reply(&msg.message, text).await {
            tracing::warn!(msg_ref = %msg.message, error = %e, "reply failed");
        }
    }

    async fn react(&self, msg: &NewMessage, emoji: &str) {
        if let Err(e) = self.chat.react(&msg.message, emoji).await {
            tracing::warn!(msg_ref = %msg.message, emoji, error = %e, "reaction failed");
        }
    }

    /// Credit the reacted message's author when the message carries a tracked
    /// reaction type. The counter bumped is the triggering emoji, in the map
    /// picked by the message's category.
    pub async fn on_reaction(&self, ev: ReactionAdded) {
        let Some(actor) = ev.user_id else {
            tracing::debug!(msg_ref = %ev.message, "reaction without user, ignored");
            return;
        };
        if actor == self.chat.self_id() {
            return;
        }

        let fetched = match self.chat.fetch_message(&ev.message).await {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(msg_ref = %ev.message, error = %e, "message fetch failed");
                return;
            }
        };

        let types = &self.cfg.tracked_reactions.types;
        let Some(category) = classify(fetched.reactions.as_slice(), types) else {
            tracing::debug!(msg_ref = %ev.message, "untracked message, ignored");
            return;
        };

        let count = self
            .scoreboard
            .record(&fetched.author_id, category, &ev.emoji)
            .await;
        tracing::info!(
            user = %fetched.author_id,
            %category,
            emoji = %ev.emoji,
            count,
            "tally"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Category, ChannelId, MessageRef},
        errors::Error,
        messaging::types::FetchedMessage,
        Result,
    };
    use async_trait::async_trait;
    use std::{collections::HashMap, sync::Mutex};

    const BOT: &str = "bot";

    #[derive(Default)]
    struct FakeChat {
        messages: Mutex<HashMap<MessageRef, FetchedMessage>>,
        replies: Mutex<Vec<(MessageRef, String)>>,
        reactions: Mutex<Vec<(MessageRef, String)>>,
        channel_lookups: Mutex<Vec<ChannelId>>,
        fail_sends: bool,
    }

    impl FakeChat {
        fn with_message(self, msg: &MessageRef, author: &str, reactions: &[&str]) -> Self {
            self.messages.lock().unwrap().insert(
                msg.clone(),
                FetchedMessage {
                    author_id: UserId::from(author),
                    reactions: reactions.iter().map(|r| r.to_string()).collect(),
                },
            );
            self
        }

        fn replies(&self) -> Vec<String> {
            self.replies
                .lock()
                .unwrap()
                .iter()
                .map(|(_, t)| t.clone())
                .collect()
        }

        fn reactions(&self) -> Vec<String> {
            self.reactions
                .lock()
                .unwrap()
                .iter()
                .map(|(_, e)| e.clone())
                .collect()
        }

        fn channel_lookups(&self) -> usize {
            self.channel_lookups.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatPort for FakeChat {
        fn self_id(&self) -> UserId {
            UserId::from(BOT)
        }

        async fn fetch_message(&self, msg: &MessageRef) -> Result<FetchedMessage> {
            self.messages
                .lock()
                .unwrap()
                .get(msg)
                .cloned()
                .ok_or_else(|| Error::External("unknown message".to_string()))
        }

        async fn channel_name(&self, channel_id: &ChannelId) -> Result<String> {
            self.channel_lookups.lock().unwrap().push(channel_id.clone());
            Ok(format!("#{}", channel_id.0))
        }

        async fn reply(&self, msg: &MessageRef, text: &str) -> Result<()> {
            if self.fail_sends {
                return Err(Error::External("send failed".to_string()));
            }
            self.replies
                .lock()
                .unwrap()
                .push((msg.clone(), text.to_string()));
            Ok(())
        }

        async fn react(&self, msg: &MessageRef, emoji: &str) -> Result<()> {
            if self.fail_sends {
                return Err(Error::External("send failed".to_string()));
            }
            self.reactions
                .lock()
                .unwrap()
                .push((msg.clone(), emoji.to_string()));
            Ok(())
        }
    }

    fn test_config() -> Arc<Config> {
        Arc::new(
            Config::from_toml_str(
                r#"
Token = "x"
CommandPrefix = "!tally"

[TrackedReactions]
Ratings = ["👍", "👎"]

[TrackedReactions.Types]
"❓" = "question"
"❗" = "answer"
"#,
            )
            .unwrap(),
        )
    }

    fn bot_with(chat: FakeChat) -> (TallyBot, Arc<FakeChat>) {
        let chat = Arc::new(chat);
        let bot = TallyBot::new(test_config(), Arc::new(Scoreboard::new()), chat.clone());
        (bot, chat)
    }

    fn message(author: &str, content: &str) -> NewMessage {
        NewMessage {
            message: MessageRef::new("c1", "m1"),
            author_id: UserId::from(author),
            author_name: format!("user-{author}"),
            content: content.to_string(),
        }
    }

    fn reaction(msg: &MessageRef, user: Option<&str>, emoji: &str) -> ReactionAdded {
        ReactionAdded {
            message: msg.clone(),
            user_id: user.map(UserId::from),
            emoji: emoji.to_string(),
        }
    }

    const ZERO: &str = "```❓[👍:0] [👎:0] \n❗[👍:0] [👎:0] \n```";

    #[tokio::test]
    async fn answer_reactions_credit_message_author_by_emoji() {
        let m = MessageRef::new("c1", "m1");
        let (bot, _) = bot_with(FakeChat::default().with_message(&m, "alice", &["❗", "👍"]));

        for _ in 0..3 {
            bot.on_reaction(reaction(&m, Some("bob"), "👍")).await;
        }

        let score = bot.scoreboard().score(&UserId::from("alice")).await;
        assert_eq!(score.count(Category::Answer, "👍"), 3);
        assert_eq!(score.count(Category::Question, "👍"), 0);
        assert!(!bot.scoreboard().contains(&UserId::from("bob")).await);
    }

    #[tokio::test]
    async fn question_reactions_land_in_questions() {
        let m = MessageRef::new("c1", "m2");
        let (bot, _) = bot_with(FakeChat::default().with_message(&m, "alice", &["👎", "❓"]));

        bot.on_reaction(reaction(&m, Some("bob"), "👎")).await;

        let score = bot.scoreboard().score(&UserId::from("alice")).await;
        assert_eq!(score.count(Category::Question, "👎"), 1);
        assert!(score.answers.is_empty());
    }

    #[tokio::test]
    async fn self_reactions_never_mutate() {
        let m = MessageRef::new("c1", "m1");
        let (bot, _) = bot_with(FakeChat::default().with_message(&m, "alice", &["❗"]));

        bot.on_reaction(reaction(&m, Some(BOT), "👍")).await;
        bot.on_reaction(reaction(&m, None, "👍")).await;

        assert_eq!(bot.scoreboard().user_count().await, 0);
    }

    #[tokio::test]
    async fn untracked_messages_never_mutate() {
        let m = MessageRef::new("c1", "m1");
        let (bot, _) = bot_with(FakeChat::default().with_message(&m, "alice", &["👍", "🔥"]));

        bot.on_reaction(reaction(&m, Some("bob"), "👍")).await;

        assert_eq!(bot.scoreboard().user_count().await, 0);
    }

    #[tokio::test]
    async fn fetch_failure_is_dropped() {
        let (bot, _) = bot_with(FakeChat::default());

        bot.on_reaction(reaction(&MessageRef::new("c9", "m9"), Some("bob"), "👍"))
            .await;

        assert_eq!(bot.scoreboard().user_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reactions_are_all_counted() {
        const N: u64 = 100;
        let m = MessageRef::new("c1", "m1");
        let (bot, _) = bot_with(FakeChat::default().with_message(&m, "alice", &["❗"]));

        let mut handles = Vec::new();
        for i in 0..N {
            let bot = bot.clone();
            let user = format!("u{i}");
            let ev = reaction(&m, Some(user.as_str()), "👍");
            handles.push(tokio::spawn(async move { bot.on_reaction(ev).await }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let score = bot.scoreboard().score(&UserId::from("alice")).await;
        assert_eq!(score.count(Category::Answer, "👍"), N);
    }

    #[tokio::test]
    async fn stats_on_fresh_process_is_all_zero() {
        let (bot, chat) = bot_with(FakeChat::default());

        bot.on_message(message("alice", "!tally stats")).await;

        assert_eq!(chat.replies(), vec![ZERO.to_string()]);
        assert!(chat.reactions().is_empty());
    }

    #[tokio::test]
    async fn stats_for_unknown_token_is_all_zero() {
        let (bot, chat) = bot_with(FakeChat::default());

        bot.on_message(message("alice", "!tally stats <@123>")).await;

        assert_eq!(chat.replies(), vec![ZERO.to_string()]);
    }

    #[tokio::test]
    async fn stats_reports_self_or_named_user() {
        let m = MessageRef::new("c1", "m7");
        let (bot, chat) = bot_with(FakeChat::default().with_message(&m, "alice", &["❗"]));
        bot.on_reaction(reaction(&m, Some("bob"), "👍")).await;

        bot.on_message(message("alice", "!tally stats")).await;
        bot.on_message(message("bob", "!tally stats alice")).await;
        bot.on_message(message("bob", "!tally stats")).await;

        let want = "```❓[👍:0] [👎:0] \n❗[👍:1] [👎:0] \n```".to_string();
        assert_eq!(chat.replies(), vec![want.clone(), want, ZERO.to_string()]);
    }

    #[tokio::test]
    async fn ping_reacts_and_replies_once() {
        let (bot, chat) = bot_with(FakeChat::default());

        bot.on_message(message("alice", "!tally ping")).await;

        assert_eq!(chat.reactions(), vec![ACK_EMOJI.to_string()]);
        assert_eq!(chat.replies(), vec![PONG.to_string()]);
    }

    #[tokio::test]
    async fn bare_prefix_and_unknown_commands_only_react() {
        let (bot, chat) = bot_with(FakeChat::default());

        bot.on_message(message("alice", "!tally")).await;
        bot.on_message(message("alice", "!tally dance")).await;

        assert_eq!(
            chat.reactions(),
            vec![
                UNKNOWN_COMMAND_EMOJI.to_string(),
                UNKNOWN_COMMAND_EMOJI.to_string()
            ]
        );
        assert!(chat.replies().is_empty());
    }

    #[tokio::test]
    async fn plain_and_self_messages_produce_no_output() {
        let (bot, chat) = bot_with(FakeChat::default());

        bot.on_message(message("alice", "hello there")).await;
        bot.on_message(message(BOT, "!tally ping")).await;

        assert!(chat.replies().is_empty());
        assert!(chat.reactions().is_empty());
        assert_eq!(chat.channel_lookups(), 1);
    }

    #[tokio::test]
    async fn commands_skip_the_logging_hook() {
        let (bot, chat) = bot_with(FakeChat::default());

        bot.on_message(message("alice", "!tally dance")).await;
        bot.on_message(message("alice", "!tally ping")).await;
        bot.on_message(message("alice", "!tally")).await;
        assert_eq!(chat.channel_lookups(), 0);

        bot.on_message(message("alice", "just chatting")).await;
        assert_eq!(chat.channel_lookups(), 1);
    }

    #[tokio::test]
    async fn send_failures_do_not_touch_the_scoreboard() {
        let (bot, chat) = bot_with(FakeChat {
            fail_sends: true,
            ..FakeChat::default()
        });

        bot.handle(IncomingEvent::MessageCreated(message("alice", "!tally ping")))
            .await;
        bot.handle(IncomingEvent::MessageCreated(message("alice", "!tally stats")))
            .await;

        assert!(chat.replies().is_empty());
        assert_eq!(bot.scoreboard().user_count().await, 0);
    }
}
