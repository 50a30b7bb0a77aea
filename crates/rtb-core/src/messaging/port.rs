use async_trait::async_trait;

use crate::{
    domain::{ChannelId, MessageRef, UserId},
    messaging::types::FetchedMessage,
    Result,
};

/// Cross-platform chat port.
///
/// Discord is the implementation today; the core only needs these calls.
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// The bot's own identity, used to drop self-originated events.
    fn self_id(&self) -> UserId;

    /// Current author and reaction set of a message.
    async fn fetch_message(&self, msg: &MessageRef) -> Result<FetchedMessage>;

    /// Human-readable channel name (for logs).
    async fn channel_name(&self, channel_id: &ChannelId) -> Result<String>;

    /// Send `text` as a threaded reply to `msg`.
    async fn reply(&self, msg: &MessageRef, text: &str) -> Result<()>;

    /// Add a reaction to `msg`.
    async fn react(&self, msg: &MessageRef, emoji: &str) -> Result<()>;
}
