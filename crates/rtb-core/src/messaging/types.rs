use crate::domain::{MessageRef, UserId};

/// Incoming chat event, already stripped of platform-specific fields.
#[derive(Clone, Debug)]
pub enum IncomingEvent {
    MessageCreated(NewMessage),
    ReactionAdded(ReactionAdded),
}

#[derive(Clone, Debug)]
pub struct NewMessage {
    pub message: MessageRef,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
}

#[derive(Clone, Debug)]
pub struct ReactionAdded {
    pub message: MessageRef,
    /// Reacting user. Some platforms omit it for certain events.
    pub user_id: Option<UserId>,
    pub emoji: String,
}

/// Message state fetched back from the platform.
#[derive(Clone, Debug)]
pub struct FetchedMessage {
    pub author_id: UserId,
    /// Reaction symbols in the order the platform reports them.
    pub reactions: Vec<String>,
}
