//! Flush pipeline - turns a detached batch into a delivered, recorded reply.
//!
//! Steps, in order:
//! 1. join the batch into one prompt
//! 2. `ReplyGenerator::generate` with the batch's conversation context
//! 3. `DeliverySender::send` to the batch's captured destination
//! 4. `MessageStore::record` the outgoing reply
//!
//! Every step is bounded by the pipeline timeout. The first failure stops the
//! pipeline; nothing is retried.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::domain::batch::Batch;
use crate::domain::foundation::{MessageId, UserId};
use crate::domain::messaging::{Destination, NewMessage};
use crate::ports::{
    DeliveryError, DeliveryReceipt, DeliverySender, GenerationError, MessageStore,
    PersistenceError, ReplyGenerator,
};

/// Default bound on each downstream call.
pub const DEFAULT_DOWNSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// The pipeline step a flush failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlushStage {
    Generate,
    Deliver,
    Persist,
}

impl FlushStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlushStage::Generate => "generate",
            FlushStage::Deliver => "deliver",
            FlushStage::Persist => "persist",
        }
    }
}

impl fmt::Display for FlushStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a batch was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlushError {
    #[error("reply generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("recording outgoing message failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("{stage} step timed out after {timeout:?}")]
    Timeout { stage: FlushStage, timeout: Duration },
}

impl FlushError {
    /// The step that failed.
    pub fn stage(&self) -> FlushStage {
        match self {
            FlushError::Generation(_) => FlushStage::Generate,
            FlushError::Delivery(_) => FlushStage::Deliver,
            FlushError::Persistence(_) => FlushStage::Persist,
            FlushError::Timeout { stage, .. } => *stage,
        }
    }

    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FlushError::Generation(e) => e.kind(),
            FlushError::Delivery(e) => e.kind(),
            FlushError::Persistence(e) => e.kind(),
            FlushError::Timeout { .. } => "timeout",
        }
    }
}

/// Outcome of a successful flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushReport {
    pub user_id: UserId,
    /// Number of inbound messages the reply answers.
    pub messages: usize,
    pub reply: String,
    pub receipt: DeliveryReceipt,
    pub recorded: MessageId,
}

/// The downstream collaborators a flush talks to.
#[derive(Clone)]
pub struct FlushPipeline {
    generator: Arc<dyn ReplyGenerator>,
    sender: Arc<dyn DeliverySender>,
    store: Arc<dyn MessageStore>,
    /// The relay's own address, recorded as sender of outgoing replies.
    origin: Destination,
    timeout: Duration,
}

impl FlushPipeline {
    pub fn new(
        generator: Arc<dyn ReplyGenerator>,
        sender: Arc<dyn DeliverySender>,
        store: Arc<dyn MessageStore>,
        origin: Destination,
    ) -> Self {
        Self {
            generator,
            sender,
            store,
            origin,
            timeout: DEFAULT_DOWNSTREAM_TIMEOUT,
        }
    }

    /// Sets the bound applied to each downstream call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generates, delivers and records the reply for `batch`.
    pub async fn run(&self, batch: &Batch) -> Result<FlushReport, FlushError> {
        let prompt = batch.combined_text();

        let reply = bounded(
            FlushStage::Generate,
            self.timeout,
            self.generator.generate(&prompt, batch.conversation()),
        )
        .await?;

        let receipt = bounded(
            FlushStage::Deliver,
            self.timeout,
            self.sender.send(batch.destination(), &reply),
        )
        .await?;

        info!(
            user_id = %batch.user_id(),
            recipient = %batch.destination(),
            sender = %self.origin,
            reply_len = reply.len(),
            provider_message_id = receipt.provider_message_id.as_deref().unwrap_or("-"),
            "OUTGOING message delivered"
        );

        let outgoing = NewMessage::outgoing(
            batch.user_id(),
            batch.destination().clone(),
            self.origin.clone(),
            reply.clone(),
        );
        let stored = bounded(FlushStage::Persist, self.timeout, self.store.record(outgoing)).await?;

        Ok(FlushReport {
            user_id: batch.user_id(),
            messages: batch.len(),
            reply,
            receipt,
            recorded: stored.id,
        })
    }
}

/// Awaits `call`, converting elapsed time into `FlushError::Timeout`.
async fn bounded<T, E, F>(stage: FlushStage, timeout: Duration, call: F) -> Result<T, FlushError>
where
    F: Future<Output = Result<T, E>>,
    FlushError: From<E>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(FlushError::from),
        Err(_) => Err(FlushError::Timeout { stage, timeout }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockReplyGenerator;
    use crate::adapters::memory::InMemoryMessageStore;
    use crate::adapters::twilio::MockDeliverySender;
    use crate::domain::messaging::{ConversationContext, MessageDirection};

    fn relay() -> Destination {
        Destination::parse("+15559990000").unwrap()
    }

    fn user_phone() -> Destination {
        Destination::parse("+15551230000").unwrap()
    }

    fn batch(messages: &[&str]) -> Batch {
        let mut batch = Batch::start(
            UserId::new(),
            messages[0],
            user_phone(),
            ConversationContext::new("conv_1").unwrap(),
        );
        for m in &messages[1..] {
            batch.push(*m);
        }
        batch
    }

    struct Fixture {
        generator: Arc<MockReplyGenerator>,
        sender: Arc<MockDeliverySender>,
        store: Arc<InMemoryMessageStore>,
        pipeline: FlushPipeline,
    }

    fn fixture(generator: MockReplyGenerator, sender: MockDeliverySender) -> Fixture {
        let generator = Arc::new(generator);
        let sender = Arc::new(sender);
        let store = Arc::new(InMemoryMessageStore::new());
        let pipeline = FlushPipeline::new(
            generator.clone(),
            sender.clone(),
            store.clone(),
            relay(),
        )
        .with_timeout(Duration::from_secs(5));
        Fixture {
            generator,
            sender,
            store,
            pipeline,
        }
    }

    #[tokio::test]
    async fn run_generates_delivers_and_records() {
        let f = fixture(
            MockReplyGenerator::new().with_reply("Sure thing"),
            MockDeliverySender::new(),
        );
        let batch = batch(&["A", "B"]);

        let report = f.pipeline.run(&batch).await.unwrap();

        assert_eq!(report.reply, "Sure thing");
        assert_eq!(report.messages, 2);

        let calls = f.generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "A\nB");
        assert_eq!(calls[0].conversation.as_str(), "conv_1");

        let sent = f.sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destination, user_phone());
        assert_eq!(sent[0].body, "Sure thing");

        let stored = f.store.all().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, report.recorded);
        assert_eq!(stored[0].direction, MessageDirection::Outgoing);
        assert_eq!(stored[0].sender, relay());
        assert_eq!(stored[0].recipient, user_phone());
    }

    #[tokio::test]
    async fn generation_failure_skips_delivery_and_persistence() {
        let f = fixture(
            MockReplyGenerator::new().with_error(GenerationError::unavailable("down")),
            MockDeliverySender::new(),
        );

        let err = f.pipeline.run(&batch(&["A"])).await.unwrap_err();

        assert_eq!(err.stage(), FlushStage::Generate);
        assert_eq!(err.kind(), "unavailable");
        assert_eq!(f.sender.send_count(), 0);
        assert!(f.store.all().await.is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_skips_persistence() {
        let f = fixture(
            MockReplyGenerator::new(),
            MockDeliverySender::new().with_error(DeliveryError::RateLimited),
        );

        let err = f.pipeline.run(&batch(&["A"])).await.unwrap_err();

        assert_eq!(err.stage(), FlushStage::Deliver);
        assert_eq!(err, FlushError::Delivery(DeliveryError::RateLimited));
        assert!(f.store.all().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_generator_times_out() {
        let f = fixture(
            MockReplyGenerator::new().with_delay(Duration::from_secs(60)),
            MockDeliverySender::new(),
        );

        let err = f.pipeline.run(&batch(&["A"])).await.unwrap_err();

        assert_eq!(
            err,
            FlushError::Timeout {
                stage: FlushStage::Generate,
                timeout: Duration::from_secs(5),
            }
        );
        assert_eq!(err.kind(), "timeout");
        assert_eq!(f.sender.send_count(), 0);
    }

    #[test]
    fn flush_error_reports_stage() {
        let err = FlushError::from(PersistenceError::database("gone"));
        assert_eq!(err.stage(), FlushStage::Persist);
        assert_eq!(err.stage().to_string(), "persist");
        assert_eq!(
            err.to_string(),
            "recording outgoing message failed: database error: gone"
        );
    }
}
