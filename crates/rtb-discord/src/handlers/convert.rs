//! serenity model <-> core domain conversions.

use serenity::model::{
    channel::{Message, Reaction, ReactionType},
    id,
};

use rtb_core::{
    domain::{ChannelId, MessageId, MessageRef, UserId},
    errors::Error,
    messaging::types::{NewMessage, ReactionAdded},
    Result,
};

/// Emoji name as Discord reports it: the character for unicode emoji, the
/// name for custom ones.
pub fn emoji_symbol(reaction: &ReactionType) -> Option<String> {
    match reaction {
        ReactionType::Unicode(s) => Some(s.clone()),
        ReactionType::Custom { name, .. } => name.clone(),
        _ => None,
    }
}

pub fn user_id(id: id::UserId) -> UserId {
    UserId(id.get().to_string())
}

pub fn message_ref(channel_id: id::ChannelId, message_id: id::MessageId) -> MessageRef {
    MessageRef::new(channel_id.get().to_string(), message_id.get().to_string())
}

pub fn new_message(msg: &Message) -> NewMessage {
    NewMessage {
        message: message_ref(msg.channel_id, msg.id),
        author_id: user_id(msg.author.id),
        author_name: msg.author.name.clone(),
        content: msg.content.clone(),
    }
}

/// `None` for reactions whose emoji has no usable name.
pub fn reaction_added(reaction: &Reaction) -> Option<ReactionAdded> {
    Some(ReactionAdded {
        message: message_ref(reaction.channel_id, reaction.message_id),
        user_id: reaction.user_id.map(user_id),
        emoji: emoji_symbol(&reaction.emoji)?,
    })
}

fn parse_snowflake(kind: &str, raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(Error::External(format!("invalid discord {kind} id: {raw:?}"))),
        Ok(n) => Ok(n),
    }
}

pub fn parse_channel_id(channel_id: &ChannelId) -> Result<id::ChannelId> {
    parse_snowflake("channel", &channel_id.0).map(id::ChannelId::new)
}

pub fn parse_message_id(message_id: &MessageId) -> Result<id::MessageId> {
    parse_snowflake("message", &message_id.0).map(id::MessageId::new)
}
