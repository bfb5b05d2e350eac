//! The single-flight clip-transform pipeline.
//!
//! The engine's filesystem is shared mutable state: two runs staging files
//! under the same names would corrupt each other. A one-permit semaphore
//! guards every run, and the busy signal is cleared on success and failure.

use std::sync::Arc;

use clipdeck_common::config::ConcurrencyPolicy;
use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::artifact::Artifact;
use crate::engine::TranscodeEngine;
use crate::operation::{ClipOperation, OperationKind, INPUT_FILE};
use crate::source::SourceVideo;

/// Signals delivered to the editor shell.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A transform began; the shell should show its busy state.
    Started { kind: OperationKind },
    /// The transform produced an artifact.
    ResultReady {
        kind: OperationKind,
        mime: &'static str,
        bytes: usize,
        filename: &'static str,
    },
    /// The transform failed; prior state is untouched.
    Failed { kind: OperationKind, message: String },
    /// The transform is over, whatever the outcome.
    Ended { kind: OperationKind, success: bool },
}

/// Callback receiving pipeline events.
pub type EventSink = Arc<dyn Fn(PipelineEvent) + Send + Sync>;

/// Drives a [`TranscodeEngine`] through stage → run → read → wrap.
pub struct TranscodePipeline<E> {
    engine: E,
    permit: Semaphore,
    policy: ConcurrencyPolicy,
    sink: Option<EventSink>,
}

impl<E: TranscodeEngine> TranscodePipeline<E> {
    pub fn new(engine: E, policy: ConcurrencyPolicy) -> Self {
        Self {
            engine,
            permit: Semaphore::new(1),
            policy,
            sink: None,
        }
    }

    /// Attach the shell's event callback.
    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Whether a transform currently holds the engine.
    pub fn is_busy(&self) -> bool {
        self.permit.available_permits() == 0
    }

    /// Run one transform against `source`.
    ///
    /// Parameters and preconditions are checked before the engine is
    /// touched. `Started` and `Ended` always come in pairs once the permit is
    /// acquired.
    pub async fn run(&self, operation: &ClipOperation, source: &SourceVideo) -> ClipdeckResult<Artifact> {
        let kind = operation.kind();
        operation.validate()?;
        source.validate()?;

        let _permit = self.acquire().await?;

        tracing::info!(op = %kind, source = %source.name, bytes = source.bytes.len(), "Transform started");
        self.emit(PipelineEvent::Started { kind });

        let result = self.execute(operation, source).await;

        match &result {
            Ok(artifact) => {
                tracing::info!(op = %kind, bytes = artifact.len(), mime = artifact.mime, "Transform finished");
                self.emit(PipelineEvent::ResultReady {
                    kind,
                    mime: artifact.mime,
                    bytes: artifact.len(),
                    filename: artifact.suggested_filename,
                });
            }
            Err(e) => {
                tracing::warn!(op = %kind, error = %e, "Transform failed");
                self.emit(PipelineEvent::Failed {
                    kind,
                    message: e.to_string(),
                });
            }
        }
        self.emit(PipelineEvent::Ended {
            kind,
            success: result.is_ok(),
        });

        result
    }

    async fn acquire(&self) -> ClipdeckResult<SemaphorePermit<'_>> {
        match self.policy {
            ConcurrencyPolicy::Reject => self.permit.try_acquire().map_err(|_| {
                tracing::debug!("Transform rejected, engine busy");
                ClipdeckError::Busy
            }),
            ConcurrencyPolicy::Queue => self
                .permit
                .acquire()
                .await
                .map_err(|_| ClipdeckError::transcode("Engine permit closed")),
        }
    }

    async fn execute(&self, operation: &ClipOperation, source: &SourceVideo) -> ClipdeckResult<Artifact> {
        let kind = operation.kind();
        let output = kind.output_file();

        self.engine.write_file(INPUT_FILE, &source.bytes).await?;
        for (name, bytes) in operation.extra_inputs() {
            self.engine.write_file(name, bytes).await?;
        }
        // A stale output from an earlier run must never be mistaken for ours.
        self.engine.remove_file(output).await?;

        let args = operation.command_args();
        tracing::debug!(engine = self.engine.name(), args = ?args, "Invoking transform command");
        self.engine.run(&args).await?;

        let bytes = self.engine.read_file(output).await?;
        if bytes.is_empty() {
            return Err(ClipdeckError::transcode(format!(
                "Engine produced an empty {output}"
            )));
        }
        Ok(Artifact::new(kind, bytes))
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(sink) = &self.sink {
            sink(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{ClipRange, ResizeDimensions, FILTER_FILE};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// In-memory engine: writes `"<args>"` into the output file named by
    /// the last argument.
    #[derive(Default)]
    struct FakeEngine {
        files: Mutex<HashMap<String, Vec<u8>>>,
        commands: Mutex<Vec<Vec<String>>>,
        fail_with: Option<String>,
        skip_output: bool,
        gate: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    #[async_trait::async_trait]
    impl TranscodeEngine for FakeEngine {
        async fn write_file(&self, name: &str, bytes: &[u8]) -> ClipdeckResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(name.to_string(), bytes.to_vec());
            Ok(())
        }

        async fn read_file(&self, name: &str) -> ClipdeckResult<Vec<u8>> {
            self.files
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .ok_or_else(|| ClipdeckError::transcode(format!("Engine produced no {name}")))
        }

        async fn remove_file(&self, name: &str) -> ClipdeckResult<()> {
            self.files.lock().unwrap().remove(name);
            Ok(())
        }

        async fn run(&self, args: &[String]) -> ClipdeckResult<()> {
            self.commands.lock().unwrap().push(args.to_vec());
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            if let Some(message) = &self.fail_with {
                return Err(ClipdeckError::transcode(message.clone()));
            }
            if !self.skip_output {
                let output = args.last().cloned().unwrap_or_default();
                self.files
                    .lock()
                    .unwrap()
                    .insert(output, args.join(" ").into_bytes());
            }
            Ok(())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn source() -> SourceVideo {
        SourceVideo::new("clip.mp4", b"source-bytes".to_vec(), Some(100.0))
    }

    fn recording_sink() -> (EventSink, Arc<Mutex<Vec<PipelineEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let captured = events.clone();
        let sink: EventSink = Arc::new(move |e| captured.lock().unwrap().push(e));
        (sink, events)
    }

    #[tokio::test]
    async fn test_overlay_stages_both_inputs_and_runs_one_command() {
        let pipeline = TranscodePipeline::new(FakeEngine::default(), ConcurrencyPolicy::Reject);
        let op = ClipOperation::Overlay {
            snapshot_png: b"png".to_vec(),
        };

        let artifact = pipeline.run(&op, &source()).await.unwrap();

        let engine = pipeline.engine();
        let files = engine.files.lock().unwrap();
        assert_eq!(files[INPUT_FILE], b"source-bytes");
        assert_eq!(files[FILTER_FILE], b"png");
        assert_eq!(engine.commands.lock().unwrap().len(), 1);
        assert_eq!(artifact.kind, OperationKind::Overlay);
        assert_eq!(artifact.mime, "video/mp4");
        assert_eq!(
            String::from_utf8(artifact.bytes).unwrap(),
            op.command_args().join(" ")
        );
    }

    #[tokio::test]
    async fn test_events_on_success() {
        let (sink, events) = recording_sink();
        let pipeline = TranscodePipeline::new(FakeEngine::default(), ConcurrencyPolicy::Reject)
            .with_event_sink(sink);
        let op = ClipOperation::Gif(ClipRange::from_slider([25.0, 75.0], 100.0).unwrap());

        pipeline.run(&op, &source()).await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                PipelineEvent::Started {
                    kind: OperationKind::Gif
                },
                PipelineEvent::ResultReady {
                    kind: OperationKind::Gif,
                    mime: "image/gif",
                    bytes: op.command_args().join(" ").len(),
                    filename: "clip.gif",
                },
                PipelineEvent::Ended {
                    kind: OperationKind::Gif,
                    success: true
                },
            ]
        );
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_engine_failure_still_ends_processing() {
        let (sink, events) = recording_sink();
        let engine = FakeEngine {
            fail_with: Some("exit status 1".into()),
            ..FakeEngine::default()
        };
        let pipeline =
            TranscodePipeline::new(engine, ConcurrencyPolicy::Reject).with_event_sink(sink);
        let op = ClipOperation::Resize(ResizeDimensions::new(320, 240).unwrap());

        let err = pipeline.run(&op, &source()).await.unwrap_err();
        assert!(matches!(err, ClipdeckError::Transcode { .. }));

        let events = events.lock().unwrap();
        assert!(matches!(events[1], PipelineEvent::Failed { .. }));
        assert_eq!(
            events.last(),
            Some(&PipelineEvent::Ended {
                kind: OperationKind::Resize,
                success: false
            })
        );
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_missing_output_is_a_failure() {
        let engine = FakeEngine {
            skip_output: true,
            ..FakeEngine::default()
        };
        let pipeline = TranscodePipeline::new(engine, ConcurrencyPolicy::Reject);
        // Leftover output from an earlier run must not be returned.
        pipeline
            .engine()
            .write_file("output.mp4", b"stale")
            .await
            .unwrap();
        let op = ClipOperation::Trim(ClipRange::new(1.0, 2.0).unwrap());
        let err = pipeline.run(&op, &source()).await.unwrap_err();
        assert!(matches!(err, ClipdeckError::Transcode { .. }));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_engine() {
        let (sink, events) = recording_sink();
        let pipeline = TranscodePipeline::new(FakeEngine::default(), ConcurrencyPolicy::Reject)
            .with_event_sink(sink);

        let backwards = ClipOperation::Trim(ClipRange {
            start_secs: 9.0,
            end_secs: 3.0,
        });
        assert!(matches!(
            pipeline.run(&backwards, &source()).await,
            Err(ClipdeckError::InvalidParameter { .. })
        ));

        let empty = SourceVideo::new("empty.mp4", Vec::new(), Some(1.0));
        let ok_op = ClipOperation::Resize(ResizeDimensions::new(2, 2).unwrap());
        assert!(matches!(
            pipeline.run(&ok_op, &empty).await,
            Err(ClipdeckError::Precondition { .. })
        ));

        assert!(events.lock().unwrap().is_empty());
        assert!(pipeline.engine().files.lock().unwrap().is_empty());
        assert!(pipeline.engine().commands.lock().unwrap().is_empty());
    }

    fn gated_pipeline(policy: ConcurrencyPolicy) -> (Arc<TranscodePipeline<FakeEngine>>, Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let engine = FakeEngine {
            gate: Some((entered.clone(), release.clone())),
            ..FakeEngine::default()
        };
        (Arc::new(TranscodePipeline::new(engine, policy)), entered, release)
    }

    #[tokio::test]
    async fn test_second_run_rejected_while_busy() {
        let (pipeline, entered, release) = gated_pipeline(ConcurrencyPolicy::Reject);
        let op = ClipOperation::Resize(ResizeDimensions::new(320, 240).unwrap());

        let first = {
            let pipeline = pipeline.clone();
            let op = op.clone();
            tokio::spawn(async move { pipeline.run(&op, &source()).await })
        };
        entered.notified().await;
        assert!(pipeline.is_busy());

        let second = pipeline.run(&op, &source()).await;
        assert!(matches!(second, Err(ClipdeckError::Busy)));

        release.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert!(!pipeline.is_busy());
        assert_eq!(pipeline.engine().commands.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_queue_policy_waits_for_permit() {
        let (pipeline, entered, release) = gated_pipeline(ConcurrencyPolicy::Queue);
        let op = ClipOperation::Resize(ResizeDimensions::new(320, 240).unwrap());

        let first = {
            let pipeline = pipeline.clone();
            let op = op.clone();
            tokio::spawn(async move { pipeline.run(&op, &source()).await })
        };
        entered.notified().await;

        let second = {
            let pipeline = pipeline.clone();
            let op = op.clone();
            tokio::spawn(async move { pipeline.run(&op, &source()).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(pipeline.engine().commands.lock().unwrap().len(), 1);

        release.notify_one();
        assert!(first.await.unwrap().is_ok());
        entered.notified().await;
        release.notify_one();
        assert!(second.await.unwrap().is_ok());
        assert_eq!(pipeline.engine().commands.lock().unwrap().len(), 2);
    }
}
