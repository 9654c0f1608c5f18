//! Batching - per-user debounce and the flush that follows it.
//!
//! - [`BatchCoordinator`] owns the map of pending batches and their timers.
//! - [`FlushPipeline`] turns one detached batch into a delivered reply.

mod coordinator;
mod flush;

pub use coordinator::{BatchCoordinator, CoordinatorConfig, DrainSummary, DEFAULT_DEBOUNCE};
pub use flush::{FlushError, FlushPipeline, FlushReport, FlushStage, DEFAULT_DOWNSTREAM_TIMEOUT};
