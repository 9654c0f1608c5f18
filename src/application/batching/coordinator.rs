//! BatchCoordinator - per-user debounce of inbound messages.
//!
//! Every inbound message for a user lands in that user's pending batch and
//! restarts the user's debounce timer. When a timer runs for its full window
//! without being replaced, the batch is detached from the map and flushed
//! through the [`FlushPipeline`].
//!
//! ## Timer Generations
//!
//! Each scheduled timer gets a generation number from a coordinator-wide
//! counter, stored next to the batch it guards. Replacing a timer aborts the
//! old task and overwrites the generation. A timer that wakes up only detaches
//! the batch if the stored generation is still its own, so a stale timer that
//! raced past its abort is a no-op rather than a second flush.
//!
//! ## Locking
//!
//! The map sits behind one `std::sync::Mutex`. Critical sections are a few
//! map operations and never span an `.await`; flushes run on the detached,
//! owned `Batch` outside the lock.
//!
//! ## Draining
//!
//! Every flush that leaves the map is registered with a `TaskTracker` before
//! the batch is detached. [`BatchCoordinator::flush_all`] flushes what is
//! still waiting and then waits on the tracker, so a shutdown never returns
//! while a reply is half generated or delivered but not yet recorded.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

use super::flush::{FlushPipeline, FlushReport};
use crate::domain::batch::Batch;
use crate::domain::foundation::UserId;
use crate::domain::messaging::{ConversationContext, Destination};

/// Default debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(10);

/// Configuration for the BatchCoordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Quiet period after the latest message before a batch flushes.
    /// Zero disables coalescing: every message is flushed on its own.
    pub debounce: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl CoordinatorConfig {
    /// Create config with custom debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Outcome of [`BatchCoordinator::flush_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainSummary {
    /// Batches taken from the map and flushed by the drain itself.
    pub drained: usize,
    /// How many of the drained batches were delivered and recorded.
    pub succeeded: usize,
    /// Flushes already running when the drain started.
    pub in_flight: usize,
}

/// Coalesces bursts of messages per user into single flushes.
///
/// Cloning is cheap; clones share the same map of pending batches.
#[derive(Clone)]
pub struct BatchCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    pipeline: FlushPipeline,
    debounce: Duration,
    batches: Mutex<HashMap<UserId, PendingBatch>>,
    generations: AtomicU64,
    flushes: TaskTracker,
}

/// A batch whose debounce timer is still running.
struct PendingBatch {
    batch: Batch,
    generation: u64,
    timer: JoinHandle<()>,
}

impl BatchCoordinator {
    pub fn new(pipeline: FlushPipeline, config: CoordinatorConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                pipeline,
                debounce: config.debounce,
                batches: Mutex::new(HashMap::new()),
                generations: AtomicU64::new(0),
                flushes: TaskTracker::new(),
            }),
        }
    }

    /// Adds a message to the user's pending batch and restarts its timer.
    ///
    /// `destination` and `conversation` are only used when this message opens
    /// a new batch; later messages in the same window keep the values the
    /// first one captured.
    ///
    /// Never awaits. Must be called from within a Tokio runtime because it
    /// spawns the debounce timer.
    pub fn add_message(
        &self,
        user_id: UserId,
        text: impl Into<String>,
        destination: Destination,
        conversation: ConversationContext,
    ) {
        let text = text.into();

        if self.inner.debounce.is_zero() {
            let batch = Batch::start(user_id, text, destination, conversation);
            debug!(user_id = %user_id, "Debounce disabled; flushing message immediately");
            let inner = Arc::clone(&self.inner);
            self.inner.flushes.spawn(async move {
                inner.flush(batch).await;
            });
            return;
        }

        let generation = self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let mut batches = self.inner.lock();
        let timer = Inner::schedule(&self.inner, user_id, generation);

        match batches.entry(user_id) {
            Entry::Occupied(mut entry) => {
                let pending = entry.get_mut();
                pending.timer.abort();
                pending.timer = timer;
                pending.generation = generation;
                pending.batch.push(text);
                debug!(
                    user_id = %user_id,
                    messages = pending.batch.len(),
                    "Added message to existing batch; timer restarted"
                );
            }
            Entry::Vacant(entry) => {
                entry.insert(PendingBatch {
                    batch: Batch::start(user_id, text, destination, conversation),
                    generation,
                    timer,
                });
                debug!(user_id = %user_id, "Created new batch");
            }
        }
    }

    /// Number of users with a batch waiting for its window to close.
    pub fn pending_batches(&self) -> usize {
        self.inner.lock().len()
    }

    /// Number of messages in the user's pending batch, if any.
    pub fn pending_messages(&self, user_id: &UserId) -> Option<usize> {
        self.inner.lock().get(user_id).map(|p| p.batch.len())
    }

    pub fn debounce(&self) -> Duration {
        self.inner.debounce
    }

    /// Flushes every pending batch now instead of waiting for its timer, then
    /// waits for flushes that were already running.
    ///
    /// Used on graceful shutdown.
    pub async fn flush_all(&self) -> DrainSummary {
        let drained: Vec<Batch> = {
            let mut batches = self.inner.lock();
            batches
                .drain()
                .map(|(_, pending)| {
                    pending.timer.abort();
                    pending.batch
                })
                .collect()
        };

        let in_flight = self.inner.flushes.len();
        let drained_count = drained.len();
        if drained_count > 0 || in_flight > 0 {
            info!(batches = drained_count, in_flight, "Flushing pending batches");
        }

        let succeeded = join_all(drained.into_iter().map(|batch| self.inner.flush(batch)))
            .await
            .into_iter()
            .filter(Option::is_some)
            .count();

        // wait() only resolves on a closed tracker. Reopened so messages that
        // arrive after the drain are still tracked.
        self.inner.flushes.close();
        self.inner.flushes.wait().await;
        self.inner.flushes.reopen();

        DrainSummary {
            drained: drained_count,
            succeeded,
            in_flight,
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, PendingBatch>> {
        // Critical sections never panic midway, so a poisoned map is still consistent.
        self.batches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawns the debounce timer for `generation`.
    fn schedule(inner: &Arc<Self>, user_id: UserId, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;

            // Taken before detaching so a drain cannot slip in between.
            let _in_flight = inner.flushes.token();
            let Some(batch) = inner.detach(user_id, generation) else {
                debug!(user_id = %user_id, generation, "Stale timer fired; batch already replaced");
                return;
            };

            inner.flush(batch).await;
        })
    }

    /// Removes the user's batch if `generation` still owns it.
    fn detach(&self, user_id: UserId, generation: u64) -> Option<Batch> {
        let mut batches = self.lock();
        match batches.get(&user_id) {
            Some(pending) if pending.generation == generation => {
                batches.remove(&user_id).map(|pending| pending.batch)
            }
            _ => None,
        }
    }

    async fn flush(&self, batch: Batch) -> Option<FlushReport> {
        debug!(
            user_id = %batch.user_id(),
            messages = batch.len(),
            "Processing batch"
        );

        match self.pipeline.run(&batch).await {
            Ok(report) => Some(report),
            Err(err) => {
                error!(
                    user_id = %batch.user_id(),
                    destination = %batch.destination(),
                    messages = batch.len(),
                    stage = err.stage().as_str(),
                    error_kind = err.kind(),
                    error = %err,
                    "Batch flush failed; batch dropped"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockReplyGenerator;
    use crate::adapters::memory::InMemoryMessageStore;
    use crate::adapters::twilio::MockDeliverySender;
    use crate::domain::messaging::MessageDirection;
    use crate::ports::{DeliveryError, GenerationError};

    const DEBOUNCE: Duration = Duration::from_secs(10);

    struct Fixture {
        generator: Arc<MockReplyGenerator>,
        sender: Arc<MockDeliverySender>,
        store: Arc<InMemoryMessageStore>,
        coordinator: BatchCoordinator,
    }

    fn fixture_with(
        generator: MockReplyGenerator,
        sender: MockDeliverySender,
        debounce: Duration,
    ) -> Fixture {
        let generator = Arc::new(generator);
        let sender = Arc::new(sender);
        let store = Arc::new(InMemoryMessageStore::new());
        let pipeline = FlushPipeline::new(
            generator.clone(),
            sender.clone(),
            store.clone(),
            Destination::parse("+15559990000").unwrap(),
        )
        .with_timeout(Duration::from_secs(5));
        let coordinator = BatchCoordinator::new(
            pipeline,
            CoordinatorConfig::default().with_debounce(debounce),
        );
        Fixture {
            generator,
            sender,
            store,
            coordinator,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MockReplyGenerator::new(), MockDeliverySender::new(), DEBOUNCE)
    }

    fn phone(n: u32) -> Destination {
        Destination::parse(format!("+1555000{:04}", n)).unwrap()
    }

    fn conv(name: &str) -> ConversationContext {
        ConversationContext::new(name).unwrap()
    }

    async fn advance(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn messages_within_window_flush_once_in_order() {
        let f = fixture();
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        advance(3).await;
        f.coordinator.add_message(user, "B", phone(1), conv("c1"));
        advance(3).await;
        f.coordinator.add_message(user, "C", phone(1), conv("c1"));

        assert_eq!(f.coordinator.pending_messages(&user), Some(3));
        assert_eq!(f.generator.call_count(), 0);

        advance(11).await;

        let calls = f.generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "A\nB\nC");
        assert_eq!(f.sender.send_count(), 1);
        assert_eq!(f.coordinator.pending_batches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_restarts_on_each_message() {
        let f = fixture();
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        advance(8).await;
        f.coordinator.add_message(user, "B", phone(1), conv("c1"));

        // 12s after the first message but only 4s after the second.
        advance(4).await;
        assert_eq!(f.generator.call_count(), 0);
        assert_eq!(f.coordinator.pending_messages(&user), Some(2));

        advance(7).await;
        assert_eq!(f.generator.call_count(), 1);
        assert_eq!(f.generator.calls()[0].prompt, "A\nB");
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_two_batches_separated_by_quiet_period() {
        let f = fixture();
        let user = UserId::new();

        // t=0 "A", t=3 "B"
        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        advance(3).await;
        f.coordinator.add_message(user, "B", phone(1), conv("c1"));

        // t=14: first flush happened at t≈13
        advance(11).await;
        assert_eq!(f.generator.call_count(), 1);
        assert_eq!(f.generator.calls()[0].prompt, "A\nB");

        // t=20 "C"
        advance(6).await;
        f.coordinator.add_message(user, "C", phone(1), conv("c1"));
        assert_eq!(f.coordinator.pending_messages(&user), Some(1));

        // t=31: second flush happened at t≈30
        advance(11).await;
        let calls = f.generator.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].prompt, "C");
    }

    #[tokio::test(start_paused = true)]
    async fn many_rapid_messages_generate_exactly_once() {
        let f = fixture();
        let user = UserId::new();
        let expected: Vec<String> = (0..25).map(|i| format!("m{}", i)).collect();

        for text in &expected {
            f.coordinator.add_message(user, text.clone(), phone(1), conv("c1"));
            tokio::time::sleep(Duration::from_millis(200)).await;
        }

        advance(30).await;

        let calls = f.generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, expected.join("\n"));
        assert_eq!(f.sender.send_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn first_message_destination_and_context_win() {
        let f = fixture();
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("first"));
        f.coordinator.add_message(user, "B", phone(2), conv("second"));

        advance(11).await;

        let calls = f.generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].conversation.as_str(), "first");

        let sent = f.sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destination, phone(1));
    }

    #[tokio::test(start_paused = true)]
    async fn delivery_failure_still_removes_batch() {
        let f = fixture_with(
            MockReplyGenerator::new(),
            MockDeliverySender::new().with_error(DeliveryError::Unavailable("503".to_string())),
            DEBOUNCE,
        );
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        advance(11).await;

        assert_eq!(f.coordinator.pending_batches(), 0);
        assert!(f.store.all().await.is_empty());

        f.coordinator.add_message(user, "B", phone(1), conv("c1"));
        assert_eq!(f.coordinator.pending_messages(&user), Some(1));

        advance(11).await;

        let calls = f.generator.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].prompt, "B");
        assert_eq!(f.store.all().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn generation_failure_drops_batch_without_delivery() {
        let f = fixture_with(
            MockReplyGenerator::new().with_error(GenerationError::AuthenticationFailed),
            MockDeliverySender::new(),
            DEBOUNCE,
        );
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        advance(11).await;

        assert_eq!(f.generator.call_count(), 1);
        assert_eq!(f.sender.send_count(), 0);
        assert_eq!(f.coordinator.pending_batches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn message_during_flush_starts_fresh_batch() {
        let f = fixture_with(
            MockReplyGenerator::new().with_delay(Duration::from_secs(3)),
            MockDeliverySender::new(),
            DEBOUNCE,
        );
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        // t=11: first batch detached and generating (until t=13)
        advance(11).await;
        assert_eq!(f.coordinator.pending_batches(), 0);

        f.coordinator.add_message(user, "B", phone(1), conv("c1"));
        assert_eq!(f.coordinator.pending_messages(&user), Some(1));

        advance(15).await;

        let calls = f.generator.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].prompt, "A");
        assert_eq!(calls[1].prompt, "B");
        assert_eq!(f.sender.send_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_users_flush_independently() {
        let f = fixture();
        let users: Vec<UserId> = (0..20).map(|_| UserId::new()).collect();

        for (i, user) in users.iter().enumerate() {
            f.coordinator
                .add_message(*user, format!("hello {}", i), phone(i as u32), conv("c"));
            f.coordinator
                .add_message(*user, format!("again {}", i), phone(i as u32), conv("c"));
        }
        assert_eq!(f.coordinator.pending_batches(), users.len());

        advance(11).await;

        let calls = f.generator.calls();
        assert_eq!(calls.len(), users.len());
        for i in 0..users.len() {
            let expected = format!("hello {}\nagain {}", i, i);
            assert!(calls.iter().any(|c| c.prompt == expected), "missing {}", expected);
        }
        assert_eq!(f.sender.send_count(), users.len());
        assert_eq!(f.coordinator.pending_batches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_flush_for_one_user_does_not_delay_another() {
        let f = fixture_with(
            MockReplyGenerator::new().with_delay(Duration::from_secs(4)),
            MockDeliverySender::new(),
            DEBOUNCE,
        );
        let slow = UserId::new();
        let fast = UserId::new();

        f.coordinator.add_message(slow, "slow", phone(1), conv("c1"));
        advance(9).await;
        f.coordinator.add_message(fast, "fast", phone(2), conv("c2"));

        // t=16: slow delivered at t=14; fast fires at t=19.
        advance(7).await;
        assert_eq!(f.sender.send_count(), 1);

        advance(8).await;
        assert_eq!(f.sender.send_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_debounce_flushes_every_message() {
        let f = fixture_with(
            MockReplyGenerator::new(),
            MockDeliverySender::new(),
            Duration::ZERO,
        );
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        f.coordinator.add_message(user, "B", phone(1), conv("c1"));
        assert_eq!(f.coordinator.pending_batches(), 0);

        advance(1).await;

        let mut prompts: Vec<String> = f.generator.calls().into_iter().map(|c| c.prompt).collect();
        prompts.sort();
        assert_eq!(prompts, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(f.sender.send_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_message_text_is_accepted() {
        let f = fixture();
        let user = UserId::new();

        f.coordinator.add_message(user, "", phone(1), conv("c1"));
        f.coordinator.add_message(user, "B", phone(1), conv("c1"));
        advance(11).await;

        assert_eq!(f.generator.calls()[0].prompt, "\nB");
    }

    #[tokio::test(start_paused = true)]
    async fn outgoing_reply_is_recorded() {
        let f = fixture_with(
            MockReplyGenerator::new().with_reply("Noted"),
            MockDeliverySender::new(),
            DEBOUNCE,
        );
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        advance(11).await;

        let stored = f.store.all().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text, "Noted");
        assert_eq!(stored[0].direction, MessageDirection::Outgoing);
        assert_eq!(stored[0].user_id, Some(user));
        assert_eq!(stored[0].recipient, phone(1));
    }

    #[tokio::test(start_paused = true)]
    async fn flush_all_drains_pending_batches() {
        let f = fixture_with(
            MockReplyGenerator::new(),
            MockDeliverySender::new().with_error(DeliveryError::RateLimited),
            DEBOUNCE,
        );
        let a = UserId::new();
        let b = UserId::new();

        f.coordinator.add_message(a, "A1", phone(1), conv("c1"));
        f.coordinator.add_message(a, "A2", phone(1), conv("c1"));
        f.coordinator.add_message(b, "B1", phone(2), conv("c2"));

        let summary = f.coordinator.flush_all().await;

        assert_eq!(
            summary,
            DrainSummary {
                drained: 2,
                succeeded: 1,
                in_flight: 0,
            }
        );
        assert_eq!(f.coordinator.pending_batches(), 0);
        assert_eq!(f.generator.call_count(), 2);
        assert_eq!(f.store.all().await.len(), 1);

        // The aborted timers must not flush again.
        advance(30).await;
        assert_eq!(f.generator.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_all_waits_for_flush_already_running() {
        let f = fixture_with(
            MockReplyGenerator::new().with_delay(Duration::from_secs(4)),
            MockDeliverySender::new(),
            DEBOUNCE,
        );
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        // t=11: timer fired at t=10, generation runs until t=14.
        advance(11).await;
        assert_eq!(f.coordinator.pending_batches(), 0);
        assert_eq!(f.sender.send_count(), 0);

        let summary = f.coordinator.flush_all().await;

        assert_eq!(summary.drained, 0);
        assert_eq!(summary.in_flight, 1);
        assert_eq!(f.sender.send_count(), 1);
        assert_eq!(f.store.all().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_all_waits_for_zero_debounce_flushes() {
        let f = fixture_with(
            MockReplyGenerator::new().with_delay(Duration::from_secs(2)),
            MockDeliverySender::new(),
            Duration::ZERO,
        );
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        f.coordinator.add_message(user, "B", phone(1), conv("c1"));

        let summary = f.coordinator.flush_all().await;

        assert_eq!(summary.drained, 0);
        assert_eq!(summary.in_flight, 2);
        assert_eq!(f.sender.send_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn coordinator_keeps_flushing_after_drain() {
        let f = fixture();
        let user = UserId::new();

        f.coordinator.flush_all().await;
        f.coordinator.add_message(user, "late", phone(1), conv("c1"));
        advance(11).await;

        assert_eq!(f.generator.calls()[0].prompt, "late");
        assert_eq!(f.sender.send_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_for_one_user_lose_and_duplicate_nothing() {
        let f = fixture_with(
            MockReplyGenerator::new(),
            MockDeliverySender::new(),
            Duration::from_millis(2),
        );
        let user = UserId::new();

        let tasks: Vec<_> = (0..8)
            .map(|t| {
                let coordinator = f.coordinator.clone();
                tokio::spawn(async move {
                    for i in 0..50 {
                        coordinator.add_message(user, format!("t{}-{}", t, i), phone(1), conv("c1"));
                        if i % 10 == 0 {
                            tokio::time::sleep(Duration::from_millis(3)).await;
                        } else {
                            tokio::task::yield_now().await;
                        }
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        f.coordinator.flush_all().await;

        let mut seen: Vec<String> = f
            .generator
            .calls()
            .iter()
            .flat_map(|c| c.prompt.split('\n').map(str::to_string).collect::<Vec<_>>())
            .collect();
        seen.sort();
        let mut expected: Vec<String> = (0..8)
            .flat_map(|t| (0..50).map(move |i| format!("t{}-{}", t, i)))
            .collect();
        expected.sort();

        assert_eq!(seen, expected);
        assert_eq!(f.sender.send_count(), f.generator.call_count());
        assert_eq!(f.coordinator.pending_batches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_does_not_detach() {
        let f = fixture();
        let user = UserId::new();

        f.coordinator.add_message(user, "A", phone(1), conv("c1"));
        f.coordinator.add_message(user, "B", phone(1), conv("c1"));

        // Generation 1 was replaced by generation 2.
        assert!(f.coordinator.inner.detach(user, 1).is_none());
        assert_eq!(f.coordinator.pending_messages(&user), Some(2));

        let batch = f.coordinator.inner.detach(user, 2).unwrap();
        assert_eq!(batch.combined_text(), "A\nB");
        assert_eq!(f.coordinator.pending_batches(), 0);
    }
}
