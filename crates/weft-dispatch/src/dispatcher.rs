//! The dispatcher and its worker thread.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};
use weft_core::{ComponentIr, Framework};

use crate::error::{DispatchError, Result};
use crate::task::{
    OptimizeOptions, OptimizeReport, SceneSummary, TaskFailure, TaskHandler, TaskKind,
    TaskOutput, TaskRequest, TransformJob, ValidationReport,
};

/// Deadline applied to every submission unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

type Reply = std::result::Result<TaskOutput, TaskFailure>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Reply>>>>;

struct Envelope {
    id: u64,
    request: TaskRequest,
}

/// Runs tasks on one background thread and matches replies by ID.
///
/// Every submission gets a fresh correlation ID and a pending entry. The
/// worker removes the entry when it finishes; a caller whose deadline
/// expires removes it first, so a late reply finds nothing and is dropped.
pub struct Dispatcher {
    sender: Mutex<Option<mpsc::UnboundedSender<Envelope>>>,
    pending: PendingMap,
    next_id: AtomicU64,
    timeout: Duration,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Dispatcher {
    /// Start the worker thread with the default deadline.
    pub fn spawn<H: TaskHandler>(handler: H) -> Result<Self> {
        Self::with_timeout(handler, DEFAULT_TIMEOUT)
    }

    /// Start the worker thread with a custom deadline.
    pub fn with_timeout<H: TaskHandler>(handler: H, timeout: Duration) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let worker_pending = Arc::clone(&pending);
        let worker = thread::Builder::new()
            .name("weft-dispatch".to_string())
            .spawn(move || run_worker(handler, receiver, worker_pending))
            .map_err(|e| DispatchError::Init(e.to_string()))?;

        debug!(timeout_ms = timeout.as_millis() as u64, "dispatcher started");

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            pending,
            next_id: AtomicU64::new(1),
            timeout,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Default deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of submissions still awaiting a reply.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether the correlation ID is still pending.
    pub fn is_pending(&self, id: u64) -> bool {
        self.pending.lock().contains_key(&id)
    }

    /// Submit a task with the default deadline.
    pub async fn submit(&self, request: TaskRequest) -> Result<TaskOutput> {
        self.submit_with_timeout(request, self.timeout).await
    }

    /// Submit a task with an explicit deadline.
    pub async fn submit_with_timeout(
        &self,
        request: TaskRequest,
        timeout: Duration,
    ) -> Result<TaskOutput> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let kind = request.kind();
        let (tx, rx) = oneshot::channel();

        self.pending.lock().insert(id, tx);

        let sent = match self.sender.lock().as_ref() {
            Some(sender) => sender.send(Envelope { id, request }).is_ok(),
            None => false,
        };
        if !sent {
            self.pending.lock().remove(&id);
            return Err(DispatchError::Closed);
        }
        trace!(id, kind = %kind, "task submitted");

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(Ok(output))) => Ok(output),
            Ok(Ok(Err(failure))) => Err(DispatchError::TaskFailed {
                id,
                kind,
                message: failure.0,
            }),
            Ok(Err(_)) => Err(DispatchError::Closed),
            Err(_) => {
                self.pending.lock().remove(&id);
                warn!(id, kind = %kind, timeout_ms = timeout.as_millis() as u64, "task timed out");
                Err(DispatchError::Timeout {
                    id,
                    kind,
                    after: timeout,
                })
            }
        }
    }

    /// Structural parse of markup.
    pub async fn parse_scene(&self, markup: impl Into<String>) -> Result<SceneSummary> {
        match self
            .submit(TaskRequest::ParseScene {
                markup: markup.into(),
            })
            .await?
        {
            TaskOutput::Scene(summary) => Ok(summary),
            other => Err(unexpected(TaskKind::ParseScene, &other)),
        }
    }

    /// Render a component plan.
    pub async fn render(&self, plan: weft_core::ComponentPlan) -> Result<ComponentIr> {
        match self.submit(TaskRequest::Transform(TransformJob::Render(plan))).await? {
            TaskOutput::Rendered(ir) => Ok(ir),
            other => Err(unexpected(TaskKind::Transform, &other)),
        }
    }

    /// Rewrite source into a target framework's syntax.
    pub async fn rewrite(&self, code: impl Into<String>, framework: Framework) -> Result<String> {
        let job = TransformJob::Rewrite {
            code: code.into(),
            framework,
        };
        match self.submit(TaskRequest::Transform(job)).await? {
            TaskOutput::Rewritten(code) => Ok(code),
            other => Err(unexpected(TaskKind::Transform, &other)),
        }
    }

    /// Strip and shrink source.
    pub async fn optimize(
        &self,
        code: impl Into<String>,
        options: OptimizeOptions,
    ) -> Result<OptimizeReport> {
        let request = TaskRequest::Optimize {
            code: code.into(),
            options,
        };
        match self.submit(request).await? {
            TaskOutput::Optimized(report) => Ok(report),
            other => Err(unexpected(TaskKind::Optimize, &other)),
        }
    }

    /// Shallow lint.
    pub async fn validate(&self, code: impl Into<String>) -> Result<ValidationReport> {
        match self.submit(TaskRequest::Validate { code: code.into() }).await? {
            TaskOutput::Validated(report) => Ok(report),
            other => Err(unexpected(TaskKind::Validate, &other)),
        }
    }

    /// Stop accepting work and wait for the worker to drain.
    ///
    /// Blocks the calling thread until queued tasks finish.
    pub fn shutdown(&self) {
        self.sender.lock().take();
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                warn!("dispatch worker exited abnormally");
            }
        }
        debug!("dispatcher stopped");
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // The worker exits once the channel closes; it is not joined here.
        self.sender.lock().take();
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("timeout", &self.timeout)
            .field("pending", &self.pending_count())
            .finish()
    }
}

fn unexpected(expected: TaskKind, got: &TaskOutput) -> DispatchError {
    DispatchError::UnexpectedOutput {
        expected,
        got: got.variant_name(),
    }
}

fn run_worker<H: TaskHandler>(
    mut handler: H,
    mut receiver: mpsc::UnboundedReceiver<Envelope>,
    pending: PendingMap,
) {
    while let Some(Envelope { id, request }) = receiver.blocking_recv() {
        let kind = request.kind();
        let reply = match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(request))) {
            Ok(reply) => reply,
            Err(_) => Err(TaskFailure::new(format!("{} task panicked", kind))),
        };

        let waiter = pending.lock().remove(&id);
        match waiter {
            Some(tx) => {
                if tx.send(reply).is_err() {
                    debug!(id, kind = %kind, "caller went away, reply dropped");
                } else {
                    trace!(id, kind = %kind, "task completed");
                }
            }
            None => debug!(id, kind = %kind, "late reply discarded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(request: TaskRequest) -> Reply {
        match request {
            TaskRequest::Validate { code } if code == "slow" => {
                thread::sleep(Duration::from_millis(200));
                Ok(TaskOutput::Validated(ValidationReport::default()))
            }
            TaskRequest::Validate { code } if code == "boom" => panic!("handler exploded"),
            TaskRequest::Validate { code } if code == "fail" => Err(TaskFailure::new("bad input")),
            TaskRequest::Validate { .. } => Ok(TaskOutput::Validated(ValidationReport::default())),
            TaskRequest::Transform(TransformJob::Rewrite { code, .. }) => {
                Ok(TaskOutput::Rewritten(code.to_uppercase()))
            }
            _ => Ok(TaskOutput::Rewritten(String::new())),
        }
    }

    #[tokio::test]
    async fn test_submit_roundtrip() {
        let dispatcher = Dispatcher::spawn(echo).unwrap();
        let code = dispatcher.rewrite("abc", Framework::Vue).await.unwrap();
        assert_eq!(code, "ABC");
        assert_eq!(dispatcher.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_task_failure_carries_message() {
        let dispatcher = Dispatcher::spawn(echo).unwrap();
        let err = dispatcher.validate("fail").await.unwrap_err();
        match err {
            DispatchError::TaskFailed { kind, message, .. } => {
                assert_eq!(kind, TaskKind::Validate);
                assert_eq!(message, "bad input");
            }
            other => panic!("expected task failure, got {:?}", other),
        }
        // Pool still serves later work
        assert!(dispatcher.validate("ok").await.is_ok());
    }

    #[tokio::test]
    async fn test_panicking_task_does_not_kill_worker() {
        let dispatcher = Dispatcher::spawn(echo).unwrap();
        let err = dispatcher.validate("boom").await.unwrap_err();
        assert!(matches!(err, DispatchError::TaskFailed { .. }));
        assert!(dispatcher.validate("ok").await.is_ok());
    }

    #[tokio::test]
    async fn test_timeout_evicts_pending_entry() {
        let dispatcher = Dispatcher::with_timeout(echo, Duration::from_millis(50)).unwrap();
        let err = dispatcher
            .submit(TaskRequest::Validate { code: "slow".into() })
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(dispatcher.pending_count(), 0);

        // The late reply is discarded and the next task completes normally.
        let output = dispatcher
            .submit_with_timeout(
                TaskRequest::Validate { code: "ok".into() },
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert!(matches!(output, TaskOutput::Validated(_)));
        assert_eq!(dispatcher.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_unexpected_output() {
        let dispatcher = Dispatcher::spawn(echo).unwrap();
        let err = dispatcher.parse_scene("<div></div>").await.unwrap_err();
        assert!(matches!(err, DispatchError::UnexpectedOutput { .. }));
    }

    #[tokio::test]
    async fn test_closed_after_shutdown() {
        let dispatcher = Dispatcher::spawn(echo).unwrap();
        dispatcher.shutdown();
        let err = dispatcher.validate("ok").await.unwrap_err();
        assert_eq!(err, DispatchError::Closed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_submissions_are_correlated() {
        let dispatcher = Arc::new(Dispatcher::spawn(echo).unwrap());
        let mut handles = Vec::new();
        for i in 0..16 {
            let d = Arc::clone(&dispatcher);
            handles.push(tokio::spawn(async move {
                let out = d.rewrite(format!("task{}", i), Framework::React).await.unwrap();
                assert_eq!(out, format!("TASK{}", i));
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(dispatcher.pending_count(), 0);
    }
}
