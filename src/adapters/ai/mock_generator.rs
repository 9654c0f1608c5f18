//! Mock reply generator for testing.
//!
//! Scripted replies and errors are consumed in order; once the script runs
//! out every call succeeds with a default reply. Calls are recorded so tests
//! can assert on the exact prompt and conversation a flush produced.
//!
//! ```ignore
//! let generator = MockReplyGenerator::new()
//!     .with_error(GenerationError::RateLimited { retry_after_secs: 5 })
//!     .with_reply("Second try works");
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::domain::messaging::ConversationContext;
use crate::ports::{GenerationError, ReplyGenerator};

/// Reply returned once the script is exhausted.
pub const DEFAULT_MOCK_REPLY: &str = "Mock reply";

/// One recorded `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationCall {
    pub prompt: String,
    pub conversation: ConversationContext,
}

/// Mock generator with scripted outcomes.
#[derive(Debug, Clone, Default)]
pub struct MockReplyGenerator {
    script: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    calls: Arc<Mutex<Vec<GenerationCall>>>,
    conversations: Arc<AtomicU32>,
    conversation_error: Option<GenerationError>,
    delay: Duration,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockReplyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        guard(&self.script).push_back(Ok(reply.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: GenerationError) -> Self {
        guard(&self.script).push_back(Err(error));
        self
    }

    /// Simulated latency per `generate` call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes every `start_conversation` call fail with `error`.
    pub fn with_conversation_error(mut self, error: GenerationError) -> Self {
        self.conversation_error = Some(error);
        self
    }

    pub fn call_count(&self) -> usize {
        guard(&self.calls).len()
    }

    pub fn calls(&self) -> Vec<GenerationCall> {
        guard(&self.calls).clone()
    }

    /// Number of conversations opened so far.
    pub fn conversations_started(&self) -> u32 {
        self.conversations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReplyGenerator for MockReplyGenerator {
    async fn generate(
        &self,
        prompt: &str,
        conversation: &ConversationContext,
    ) -> Result<String, GenerationError> {
        guard(&self.calls).push(GenerationCall {
            prompt: prompt.to_string(),
            conversation: conversation.clone(),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        guard(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_MOCK_REPLY.to_string()))
    }

    async fn start_conversation(&self) -> Result<ConversationContext, GenerationError> {
        if let Some(err) = &self.conversation_error {
            return Err(err.clone());
        }
        let n = self.conversations.fetch_add(1, Ordering::SeqCst) + 1;
        ConversationContext::new(format!("conv_mock_{}", n))
            .map_err(|e| GenerationError::parse(e.to_string()))
    }
}
