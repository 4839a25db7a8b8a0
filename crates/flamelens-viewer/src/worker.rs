//! Background work: profile loading, relayout and search.
//!
//! A dedicated thread owns a tokio runtime. Jobs come in over an unbounded
//! channel, the CPU-bound part runs on the blocking pool and every completion
//! goes back to the UI over crossbeam, tagged with the ticket it was issued
//! under. Ordering is the receiver's business.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use crossbeam_channel::Sender;
use flamelens_core::{FrameModel, SearchOutcome, SearchRequest, Sequencer, Ticket};
use tokio::sync::mpsc;

use crate::profile::{build_model, load_profile, Profile, StackFrame, WeightKind};

pub enum Job {
    Load {
        ticket: Ticket,
        path: PathBuf,
        weight: WeightKind,
    },
    Relayout {
        ticket: Ticket,
        profile: Arc<Profile>,
        weight: WeightKind,
    },
    Search(SearchRequest<StackFrame>),
}

impl Job {
    fn label(&self) -> &'static str {
        match self {
            Job::Load { .. } => "load",
            Job::Relayout { .. } => "relayout",
            Job::Search(_) => "search",
        }
    }

    fn run(self) -> WorkerEvent {
        let started = Instant::now();
        let label = self.label();
        let event = match self {
            Job::Load {
                ticket,
                path,
                weight,
            } => match load_profile(&path) {
                Ok(profile) => layout(ticket, Arc::new(profile), weight, Some(path)),
                Err(err) => WorkerEvent::Failed {
                    ticket,
                    error: format!("{err:#}"),
                },
            },
            Job::Relayout {
                ticket,
                profile,
                weight,
            } => layout(ticket, profile, weight, None),
            Job::Search(request) => WorkerEvent::Searched(request.run()),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::debug!(job = label, elapsed_ms, "job finished");
        event
    }
}

fn layout(
    ticket: Ticket,
    profile: Arc<Profile>,
    weight: WeightKind,
    path: Option<PathBuf>,
) -> WorkerEvent {
    let model = Arc::new(build_model(&profile, weight));
    WorkerEvent::Loaded {
        ticket,
        loaded: Loaded {
            profile,
            model,
            weight,
            path,
        },
    }
}

#[derive(Debug)]
pub struct Loaded {
    pub profile: Arc<Profile>,
    pub model: Arc<FrameModel<StackFrame>>,
    pub weight: WeightKind,
    /// Set for file loads, `None` for a relayout of the current profile.
    pub path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum WorkerEvent {
    Loaded { ticket: Ticket, loaded: Loaded },
    Searched(SearchOutcome),
    Failed { ticket: Ticket, error: String },
}

/// Sending half of the worker. Dropping it stops the worker thread.
pub struct WorkerHandle {
    jobs: mpsc::UnboundedSender<Job>,
    tickets: Sequencer,
}

impl WorkerHandle {
    /// Tickets for loads and relayouts; searches carry their own.
    pub fn next_ticket(&self) -> Ticket {
        self.tickets.next()
    }

    pub fn load(&self, path: PathBuf, weight: WeightKind) -> anyhow::Result<Ticket> {
        let ticket = self.next_ticket();
        self.submit(Job::Load {
            ticket,
            path,
            weight,
        })?;
        Ok(ticket)
    }

    pub fn relayout(&self, profile: Arc<Profile>, weight: WeightKind) -> anyhow::Result<Ticket> {
        let ticket = self.next_ticket();
        self.submit(Job::Relayout {
            ticket,
            profile,
            weight,
        })?;
        Ok(ticket)
    }

    pub fn search(&self, request: SearchRequest<StackFrame>) -> anyhow::Result<()> {
        self.submit(Job::Search(request))
    }

    fn submit(&self, job: Job) -> anyhow::Result<()> {
        let label = job.label();
        self.jobs
            .send(job)
            .map_err(|_| anyhow::anyhow!("background worker is not running"))
            .with_context(|| format!("failed to queue {label} job"))
    }
}

pub fn spawn_worker(tx: Sender<WorkerEvent>) -> anyhow::Result<WorkerHandle> {
    let (jobs, mut rx) = mpsc::unbounded_channel::<Job>();
    std::thread::Builder::new()
        .name("flamelens-worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_multi_thread()
                .thread_name("flamelens-pool")
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(err) => {
                    tracing::error!(error = %err, "failed to start worker runtime");
                    return;
                }
            };
            rt.block_on(async move {
                while let Some(job) = rx.recv().await {
                    tokio::spawn(run_job(job, tx.clone()));
                }
                tracing::debug!("worker queue closed");
            });
        })
        .context("failed to spawn worker thread")?;

    Ok(WorkerHandle {
        jobs,
        tickets: Sequencer::new(),
    })
}

async fn run_job(job: Job, tx: Sender<WorkerEvent>) {
    let label = job.label();
    match tokio::task::spawn_blocking(move || job.run()).await {
        Ok(event) => {
            let _ = tx.send(event);
        }
        Err(err) => tracing::warn!(job = label, error = %err, "background job aborted"),
    }
}
