//! Mock delivery sender for testing.
//!
//! Scripted errors are consumed one per `send`; after the script runs out
//! every send succeeds with a generated receipt id.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::domain::messaging::Destination;
use crate::ports::{DeliveryError, DeliveryReceipt, DeliverySender};

/// One recorded `send` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub destination: Destination,
    pub body: String,
}

/// Records deliveries instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct MockDeliverySender {
    errors: Arc<Mutex<VecDeque<DeliveryError>>>,
    sent: Arc<Mutex<Vec<SentMessage>>>,
    delay: Duration,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockDeliverySender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a failure for the next send.
    pub fn with_error(self, error: DeliveryError) -> Self {
        guard(&self.errors).push_back(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every attempted send, failed ones included.
    pub fn sent(&self) -> Vec<SentMessage> {
        guard(&self.sent).clone()
    }

    pub fn send_count(&self) -> usize {
        guard(&self.sent).len()
    }
}

#[async_trait]
impl DeliverySender for MockDeliverySender {
    async fn send(
        &self,
        destination: &Destination,
        body: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let n = {
            let mut sent = guard(&self.sent);
            sent.push(SentMessage {
                destination: destination.clone(),
                body: body.to_string(),
            });
            sent.len()
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match guard(&self.errors).pop_front() {
            Some(err) => Err(err),
            None => Ok(DeliveryReceipt::with_id(format!("SM{:032}", n))),
        }
    }
}
