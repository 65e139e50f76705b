use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared control flags and counters for one analysis job.
///
/// One instance is shared by `Arc` across every worker of a job; all fields
/// are atomics, so mutation is safe from any thread. The fatal flag is the
/// one compound mutation: [`JobState::raise_fatal`] is a single test-and-set
/// so that exactly one worker wins the right to publish the fatal signal.
#[derive(Debug, Default)]
pub struct JobState {
    cancelled: AtomicBool,
    paused: AtomicBool,
    fatal: AtomicBool,
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl JobState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cooperative cancellation: no new tasks are submitted and no
    /// further results are published once observed.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Block submission of new tasks. In-flight work keeps running.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Mark the job fatal. Returns `true` for exactly one caller: the
    /// winner publishes the user-facing signal, everyone else stays quiet.
    pub fn raise_fatal(&self) -> bool {
        !self.fatal.swap(true, Ordering::SeqCst)
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal.load(Ordering::SeqCst)
    }

    /// Fix the progress denominator after the sizing pass.
    pub fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn add_completed(&self, delta: usize) -> usize {
        self.completed.fetch_add(delta, Ordering::SeqCst) + delta
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Clear the cancel/pause requests when the terminal event is emitted,
    /// so the state can be reused for a follow-up job.
    pub fn clear_requests(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Full reset for reuse across jobs.
    pub fn reset(&self) {
        self.clear_requests();
        self.fatal.store(false, Ordering::SeqCst);
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(0, Ordering::SeqCst);
    }
}
