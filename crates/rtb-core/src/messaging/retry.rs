use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;

use crate::{
    domain::{ChannelId, MessageRef, UserId},
    messaging::{port::ChatPort, types::FetchedMessage},
    Result,
};

#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    /// Total attempts per outbound call, including the first.
    pub max_attempts: usize,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// ChatPort decorator that retries outbound replies/reactions on transient errors.
///
/// Reads (`fetch_message`, `channel_name`) pass straight through.
pub struct RetryingChat {
    inner: Arc<dyn ChatPort>,
    cfg: RetryConfig,
}

impl RetryingChat {
    pub fn new(inner: Arc<dyn ChatPort>, cfg: RetryConfig) -> Self {
        Self { inner, cfg }
    }

    async fn with_retry<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let max = self.cfg.max_attempts.max(1);
        let mut attempt = 1usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) if e.is_transient() && attempt < max => {
                    tracing::debug!(what, attempt, error = %e, "retrying");
                    attempt += 1;
                    sleep(self.cfg.backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait::async_trait]
impl ChatPort for RetryingChat {
    fn self_id(&self) -> UserId {
        self.inner.self_id()
    }

    async fn fetch_message(&self, msg: &MessageRef) -> Result<FetchedMessage> {
        self.inner.fetch_message(msg).await
    }

    async fn channel_name(&self, channel_id: &ChannelId) -> Result<String> {
        self.inner.channel_name(channel_id).await
    }

    async fn reply(&self, msg: &MessageRef, text: &str) -> Result<()> {
        self.with_retry("reply", || self.inner.reply(msg, text))
            .await
    }

    async fn react(&self, msg: &MessageRef, emoji: &str) -> Result<()> {
        self.with_retry("react", || self.inner.react(msg, emoji))
            .await
    }
}
