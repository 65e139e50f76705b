//! # Sweep Scheduler
//!
//! Concurrent dispatch and aggregation over chunker output.
//!
//! ## Pipeline
//!
//! ```text
//! SourceUnit list
//!     │
//!     ├──> Sizing pass (chunk every file, fix the progress denominator)
//!     │      └─> ChunkTask list
//!     │
//!     ├──> Bounded worker pool
//!     │      ├─> AnalysisCall per chunk
//!     │      ├─> validate + remap findings to file coordinates
//!     │      └─> Results / Progress / Fatal events
//!     │
//!     └──> exactly one Done
//! ```
//!
//! Cancellation and pause are cooperative: an in-flight analysis call is
//! never aborted, and once cancellation is observed no further results are
//! published. An authentication failure short-circuits the job through a
//! single `Fatal` event.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sweep_protocol::{AnalysisCall, Event, SourceUnit};
//! use sweep_scheduler::{JobState, Scheduler};
//!
//! async fn run(analysis: Arc<dyn AnalysisCall>, files: Vec<SourceUnit>) {
//!     let scheduler = Scheduler::new(analysis, Default::default(), 5);
//!     let state = Arc::new(JobState::new());
//!     let mut events = scheduler.run(files, state);
//!
//!     while let Some(event) = events.recv().await {
//!         if event == Event::Done {
//!             break;
//!         }
//!     }
//! }
//! ```

mod job;
mod remap;
mod scheduler;

pub use job::JobState;
pub use scheduler::{ChunkTask, Scheduler, PAUSE_POLL_INTERVAL};
