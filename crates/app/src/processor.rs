//! Serialized command processor.
//!
//! Every request, whether it comes from HTTP or from the resync ticker, goes
//! through one bounded queue consumed by one task. That task alone owns the
//! [`Registry`], so state updates and bridge traffic are strictly ordered and
//! a running sequence is never interleaved with another request.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use lumen_domain::config::RegionsConfig;
use lumen_domain::error::LumenError;
use lumen_domain::sequence::{Sequence, SequenceStep};
use lumen_domain::settings::SettingsPatch;
use lumen_domain::snapshot::Snapshot;

use crate::ports::DriverFactory;
use crate::registry::Registry;

/// Number of requests that may wait in the queue before submitters block.
pub const QUEUE_CAPACITY: usize = 64;

/// Work accepted by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Read the current state without touching the bridges.
    Snapshot,
    /// Re-send the known state of every region.
    Sync,
    /// Apply a settings patch.
    Apply(SettingsPatch),
    /// Run a sequence to completion.
    Sequence(Sequence),
}

impl Request {
    /// Decode a request body: an object is a patch, an array a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::UnknownRequest`] for any other JSON value and
    /// the decoding error of the patch or sequence otherwise.
    pub fn from_json(value: Value) -> Result<Self, LumenError> {
        match value {
            Value::Object(_) => SettingsPatch::from_value(value).map(Self::Apply),
            Value::Array(_) => Sequence::from_value(value).map(Self::Sequence),
            other => Err(LumenError::UnknownRequest(other.to_string())),
        }
    }

    /// Check every region and zone the request names against the
    /// configuration, so an invalid request can be refused before queuing.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] for the first unknown region or zone.
    pub fn validate(&self, regions: &RegionsConfig) -> Result<(), LumenError> {
        match self {
            Self::Snapshot | Self::Sync => Ok(()),
            Self::Apply(patch) => Ok(patch.validate(regions)?),
            Self::Sequence(sequence) => Ok(sequence.validate(regions)?),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Sync => "sync",
            Self::Apply(_) => "apply",
            Self::Sequence(_) => "sequence",
        }
    }
}

/// Outcome of a request: the full state after it ran.
pub type Reply = Result<Snapshot, LumenError>;

struct Envelope {
    request: Request,
    reply: Option<oneshot::Sender<Reply>>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("request", &self.request)
            .field("awaits_reply", &self.reply.is_some())
            .finish()
    }
}

/// Cheap, cloneable entry point to the processor queue.
#[derive(Debug, Clone)]
pub struct ProcessorHandle {
    sender: mpsc::Sender<Envelope>,
}

impl ProcessorHandle {
    /// Queue a request and wait for it to be handled.
    ///
    /// # Errors
    ///
    /// Returns the request's own failure, or [`LumenError::Unavailable`] once
    /// the processor has stopped.
    pub async fn submit(&self, request: Request) -> Reply {
        let (reply, receiver) = oneshot::channel();
        self.sender
            .send(Envelope {
                request,
                reply: Some(reply),
            })
            .await
            .map_err(|_| LumenError::Unavailable)?;
        receiver.await.map_err(|_| LumenError::Unavailable)?
    }

    /// Queue a request without waiting for its outcome. Failures are only
    /// logged by the processor.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Unavailable`] once the processor has stopped.
    pub async fn enqueue(&self, request: Request) -> Result<(), LumenError> {
        self.sender
            .send(Envelope {
                request,
                reply: None,
            })
            .await
            .map_err(|_| LumenError::Unavailable)
    }
}

/// The single consumer of the request queue.
pub struct CommandProcessor<F: DriverFactory> {
    registry: Registry<F>,
    receiver: mpsc::Receiver<Envelope>,
}

impl<F: DriverFactory> CommandProcessor<F> {
    /// Create the processor and the handle used to feed it.
    #[must_use]
    pub fn new(registry: Registry<F>) -> (Self, ProcessorHandle) {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        (Self { registry, receiver }, ProcessorHandle { sender })
    }

    /// Handle requests until every [`ProcessorHandle`] is dropped.
    ///
    /// A failing request is logged and reported to its submitter; it never
    /// stops the loop.
    pub async fn run(mut self) {
        tracing::info!(regions = self.registry.config().len(), "command processor started");
        while let Some(Envelope { request, reply }) = self.receiver.recv().await {
            let kind = request.kind();
            tracing::debug!(request = kind, "handling request");
            let result = self.handle(request).await;
            if let Err(err) = &result {
                tracing::error!(request = kind, error = %err.describe(), "request failed");
            }
            if let Some(reply) = reply {
                // the submitter may have gone away, nothing to do then
                let _ = reply.send(result);
            }
        }
        tracing::info!("command processor stopped");
    }

    /// Handle one request and return the state afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first failure; state applied before it is kept.
    #[tracing::instrument(skip_all, fields(request = request.kind()))]
    pub async fn handle(&mut self, request: Request) -> Reply {
        match request {
            Request::Snapshot => {}
            Request::Sync => {
                tracing::info!("resyncing every region");
                self.registry.sync().await?;
            }
            Request::Apply(patch) => self.registry.apply(&patch).await?,
            Request::Sequence(sequence) => self.execute(&sequence).await?,
        }
        self.registry.snapshot().await
    }

    #[tracing::instrument(skip_all, fields(steps = sequence.len()))]
    async fn execute(&mut self, sequence: &Sequence) -> Result<(), LumenError> {
        let baseline = self.registry.snapshot().await?.to_patch();
        for step in sequence.steps() {
            match step {
                SequenceStep::Apply(patch) => self.registry.apply(patch).await?,
                SequenceStep::Sleep(duration) => {
                    tracing::trace!(?duration, "sequence sleeping");
                    tokio::time::sleep(*duration).await;
                }
                SequenceStep::Reset => {
                    tracing::debug!("sequence reset to baseline");
                    self.registry.apply(&baseline).await?;
                }
            }
        }
        Ok(())
    }
}

impl<F> CommandProcessor<F>
where
    F: DriverFactory + 'static,
{
    /// Run the processor on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
