use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use sweep_code_chunker::{Chunk, LanguageTag, StructuralChunker};
use sweep_protocol::{AnalysisCall, AnalysisResult, Event, FailureKind, SourceUnit};

use crate::job::JobState;
use crate::remap::remap_findings;

/// How often a blocked submission loop re-checks the pause flag. Every wake
/// also re-checks cancellation so a cancel during pause is honored promptly.
pub const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A chunk bound to its owning file, queued for analysis.
#[derive(Debug, Clone)]
pub struct ChunkTask {
    /// Index into the job's file list.
    pub file_index: usize,

    /// Position within the owning file's chunk list.
    pub ordinal: usize,

    pub chunk: Chunk,
}

/// Bounded worker pool that fans chunk tasks out to the analysis
/// collaborator and aggregates results into the job's event stream.
///
/// The scheduler imposes no per-call timeout of its own: a collaborator call
/// that never returns permanently occupies one worker slot. Bounding call
/// latency is the collaborator's responsibility.
pub struct Scheduler {
    analysis: Arc<dyn AnalysisCall>,
    chunker: Arc<StructuralChunker>,
    max_concurrency: usize,
}

impl Scheduler {
    pub fn new(
        analysis: Arc<dyn AnalysisCall>,
        chunker: StructuralChunker,
        max_concurrency: usize,
    ) -> Self {
        Self {
            analysis,
            chunker: Arc::new(chunker),
            max_concurrency,
        }
    }

    /// Run one job over the given files.
    ///
    /// Returns the job's event stream. The stream always terminates with
    /// exactly one [`Event::Done`], whether the job completes naturally, is
    /// cancelled, or short-circuits on an authentication failure. `Done`
    /// clears the state's cancel/pause requests so it can be reused.
    pub fn run(&self, files: Vec<SourceUnit>, state: Arc<JobState>) -> UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();

        let analysis = Arc::clone(&self.analysis);
        let chunker = Arc::clone(&self.chunker);
        let cap = self.max_concurrency;

        tokio::spawn(async move {
            drive_job(analysis, chunker, cap, files, state, tx).await;
        });

        rx
    }
}

async fn drive_job(
    analysis: Arc<dyn AnalysisCall>,
    chunker: Arc<StructuralChunker>,
    cap: usize,
    files: Vec<SourceUnit>,
    state: Arc<JobState>,
    tx: UnboundedSender<Event>,
) {
    // Sizing pass: chunk every file up front so the progress denominator is
    // fixed before any dispatch. Unreadable input (empty text) is skipped
    // and logged, never fatal.
    let mut tasks: Vec<ChunkTask> = Vec::new();
    for (file_index, unit) in files.iter().enumerate() {
        if unit.text.is_empty() {
            log::warn!("skipping empty file: {}", unit.path);
            continue;
        }

        let chunks = chunker.chunk(&unit.text, LanguageTag::from_tag(&unit.language_tag));
        log::debug!("{}: {} chunk(s)", unit.path, chunks.len());

        for (ordinal, chunk) in chunks.into_iter().enumerate() {
            tasks.push(ChunkTask {
                file_index,
                ordinal,
                chunk,
            });
        }
    }

    state.set_total(tasks.len());
    log::info!(
        "job sized: {} file(s), {} chunk task(s)",
        files.len(),
        tasks.len()
    );

    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let workers = cap.min(available).min(tasks.len().max(1)).max(1);

    let files = Arc::new(files);
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut in_flight = JoinSet::new();

    for task in tasks {
        // Submission gate: pause blocks new work without touching in-flight
        // calls; cancellation and fatal short-circuit stop submission.
        loop {
            if state.is_cancelled() || state.is_fatal() {
                break;
            }
            if !state.is_paused() {
                break;
            }
            tokio::time::sleep(PAUSE_POLL_INTERVAL).await;
        }
        if state.is_cancelled() || state.is_fatal() {
            break;
        }

        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };

        let analysis = Arc::clone(&analysis);
        let files = Arc::clone(&files);
        let state = Arc::clone(&state);
        let tx = tx.clone();

        in_flight.spawn(async move {
            let _permit = permit;
            run_task(analysis.as_ref(), &files, task, &state, &tx).await;
        });
    }

    // Drain: in-flight calls are never aborted, even on cancel or fatal.
    while in_flight.join_next().await.is_some() {}

    state.clear_requests();
    let _ = tx.send(Event::Done);
}

async fn run_task(
    analysis: &dyn AnalysisCall,
    files: &[SourceUnit],
    task: ChunkTask,
    state: &JobState,
    tx: &UnboundedSender<Event>,
) {
    if state.is_cancelled() || state.is_fatal() {
        return;
    }

    // A worker that was already queued when the job paused waits here too,
    // re-checking cancellation on every wake.
    while state.is_paused() {
        if state.is_cancelled() {
            return;
        }
        tokio::time::sleep(PAUSE_POLL_INTERVAL).await;
    }
    if state.is_cancelled() {
        return;
    }

    let unit = &files[task.file_index];
    log::debug!(
        "analyzing {} chunk #{} [{}-{}] ({})",
        unit.path,
        task.ordinal,
        task.chunk.start_line,
        task.chunk.end_line,
        task.chunk.label
    );

    let result = analysis.analyze(&task.chunk.text, &unit.language_tag).await;

    // Cancellation observed after the call suppresses publication; the unit
    // is simply abandoned.
    if state.is_cancelled() {
        return;
    }

    match result {
        AnalysisResult::Findings(raw) => {
            let findings = remap_findings(raw, &task.chunk, &unit.path, unit.line_count());
            let _ = tx.send(Event::Results {
                path: unit.path.clone(),
                findings,
            });
            state.add_completed(1);
            let _ = tx.send(Event::Progress { delta: 1 });
        }
        AnalysisResult::Failure(failure) => match failure.kind {
            FailureKind::Auth => {
                if state.raise_fatal() {
                    log::error!("{}: {failure}", unit.path);
                    let _ = tx.send(Event::Fatal {
                        reason: failure.to_string(),
                    });
                }
                state.add_completed(1);
                let _ = tx.send(Event::Progress { delta: 1 });
            }
            FailureKind::Transient => {
                // Skip-and-continue; retry policy lives in the collaborator.
                log::warn!(
                    "{} chunk #{}: {failure}; unit skipped",
                    unit.path,
                    task.ordinal
                );
                state.add_completed(1);
                let _ = tx.send(Event::Progress { delta: 1 });
            }
            FailureKind::Malformed => {
                // Zero-finding success.
                log::warn!(
                    "{} chunk #{}: {failure}; treated as no findings",
                    unit.path,
                    task.ordinal
                );
                let _ = tx.send(Event::Results {
                    path: unit.path.clone(),
                    findings: Vec::new(),
                });
                state.add_completed(1);
                let _ = tx.send(Event::Progress { delta: 1 });
            }
        },
    }
}
