//! Batch driver.
//!
//! Runs the fetch pipeline for each (kind, destination) pair. A failing pair
//! is recorded and the batch moves on; nothing a single pair does can abort
//! the run. Pairs are processed strictly in order by default; with a
//! concurrency above one, up to that many pairs are in flight at once and
//! the report still lists them in input order.

mod pipeline;
mod sink;

pub use pipeline::Fetched;
pub use sink::TracingEventSink;

use std::sync::Arc;

use futures_util::{StreamExt, stream};
use petfetch_core::{
    BatchEvent, BatchEventSink, BatchPair, BatchReport, FetchError, FetchRequest, ImageDownloader,
    MAX_CONCURRENCY, NoopEventSink, PairOutcome, PairReport, ProcessInvoker, RequestFactory,
};
use tracing::{debug, warn};

use pipeline::Stages;

/// Drives pairs through invoke, scan and download.
pub struct BatchDriver {
    requests: RequestFactory,
    invoker: Arc<dyn ProcessInvoker>,
    downloader: Arc<dyn ImageDownloader>,
    sink: Arc<dyn BatchEventSink>,
    concurrency: usize,
}

impl BatchDriver {
    /// Sequential driver that discards progress events.
    pub fn new(
        requests: RequestFactory,
        invoker: Arc<dyn ProcessInvoker>,
        downloader: Arc<dyn ImageDownloader>,
    ) -> Self {
        Self {
            requests,
            invoker,
            downloader,
            sink: Arc::new(NoopEventSink::new()),
            concurrency: 1,
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn BatchEventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Number of pairs in flight at once, clamped to `1..=MAX_CONCURRENCY`.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn stages(&self) -> Stages<'_> {
        Stages {
            invoker: self.invoker.as_ref(),
            downloader: self.downloader.as_ref(),
            sink: self.sink.as_ref(),
        }
    }

    /// Fetch a single image without emitting batch events.
    pub async fn fetch(&self, pair: &BatchPair) -> Result<Fetched, FetchError> {
        let request = self.requests.build(pair.kind.clone());
        let stages = Stages {
            sink: &NoopEventSink,
            ..self.stages()
        };
        stages.run(0, &request, &pair.destination).await
    }

    /// Run every pair and report per-pair outcomes in input order.
    pub async fn run(&self, pairs: &[BatchPair]) -> BatchReport {
        let total = pairs.len();
        debug!(total, concurrency = self.concurrency, "Starting batch");
        self.sink.emit(BatchEvent::Started { total });

        let reports: Vec<PairReport> = stream::iter(pairs.iter().enumerate())
            .map(|(index, pair)| {
                // Ids are assigned here so they follow input order.
                let request = self.requests.build(pair.kind.clone());
                self.run_pair(index, pair, request)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = BatchReport { pairs: reports };
        self.sink.emit(BatchEvent::Finished {
            succeeded: report.succeeded(),
            failed: report.failed(),
        });
        debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished"
        );
        report
    }

    async fn run_pair(&self, index: usize, pair: &BatchPair, request: FetchRequest) -> PairReport {
        self.sink.emit(BatchEvent::PairStarted {
            index,
            kind: pair.kind.clone(),
            destination: pair.destination.clone(),
        });

        let outcome = match self.stages().run(index, &request, &pair.destination).await {
            Ok(fetched) => {
                self.sink.emit(BatchEvent::PairCompleted {
                    index,
                    kind: pair.kind.clone(),
                    destination: pair.destination.clone(),
                    url: fetched.url.to_string(),
                    bytes: fetched.bytes,
                });
                PairOutcome::Completed {
                    url: fetched.url.into_string(),
                    bytes: fetched.bytes,
                }
            }
            Err(e) => {
                warn!(
                    index,
                    kind = %pair.kind,
                    destination = %pair.destination.display(),
                    stage = %e.stage(),
                    error = %e,
                    "Pair failed"
                );
                self.sink.emit(BatchEvent::PairFailed {
                    index,
                    kind: pair.kind.clone(),
                    destination: pair.destination.clone(),
                    stage: e.stage(),
                    error: e.to_string(),
                });
                PairOutcome::failed(&e)
            }
        };

        PairReport {
            pair: pair.clone(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use petfetch_core::{
        DownloadError, FetchStage, ImageUrl, InvokeError, PetKind, ProcessOutput,
    };
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ------------------------------------------------------------------------
    // Fakes
    // ------------------------------------------------------------------------

    /// Answers each kind with a canned stdout, or fails for unknown kinds.
    struct FakeInvoker {
        seen: Mutex<Vec<FetchRequest>>,
        delay: Option<Duration>,
    }

    impl FakeInvoker {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                delay: None,
            }
        }
    }

    #[async_trait]
    impl ProcessInvoker for FakeInvoker {
        async fn invoke(&self, request: &FetchRequest) -> Result<ProcessOutput, InvokeError> {
            self.seen.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                // Earlier pairs finish last.
                let factor = u32::try_from(10 - request.id.min(10)).unwrap();
                tokio::time::sleep(delay * factor).await;
            }
            let stdout = match request.params.kind.as_str() {
                "cat" => "{\"imageUrl\":\"http://example/cat.jpg\"}\n".to_string(),
                "dog" => "{\"imageUrl\":\"https://example/dog.jpg\"}\n".to_string(),
                "fox" => "nothing useful\n".to_string(),
                other => {
                    return Err(InvokeError::ExitStatus {
                        code: Some(1),
                        stderr: format!("unknown kind {other}\n"),
                    });
                }
            };
            Ok(ProcessOutput {
                stdout,
                stderr: String::new(),
                exit_code: Some(0),
            })
        }
    }

    #[derive(Default)]
    struct FakeDownloader {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ImageDownloader for FakeDownloader {
        async fn download(&self, url: &ImageUrl, _destination: &Path) -> Result<u64, DownloadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DownloadError::Status {
                    url: url.to_string(),
                    status: 503,
                });
            }
            Ok(url.as_str().len() as u64)
        }
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<BatchEvent>>);

    impl BatchEventSink for RecordingSink {
        fn emit(&self, event: BatchEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    fn driver(
        invoker: Arc<FakeInvoker>,
        downloader: Arc<FakeDownloader>,
        sink: Arc<RecordingSink>,
    ) -> BatchDriver {
        BatchDriver::new(RequestFactory::new("get_pet_image"), invoker, downloader).with_sink(sink)
    }

    // ------------------------------------------------------------------------
    // Outcomes
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_failure_does_not_stop_later_pairs() {
        let invoker = Arc::new(FakeInvoker::new());
        let downloader = Arc::new(FakeDownloader::default());
        let sink = Arc::new(RecordingSink::default());
        let pairs = vec![
            BatchPair::new("axolotl", "a.jpg"),
            BatchPair::new("cat", "cat.jpg"),
            BatchPair::new("fox", "fox.jpg"),
            BatchPair::new("dog", "dog.jpg"),
        ];

        let report = driver(invoker, downloader.clone(), sink).run(&pairs).await;

        assert_eq!(report.total(), 4);
        assert_eq!(report.succeeded(), 2);
        assert!(matches!(
            report.pairs[0].outcome,
            PairOutcome::Failed { stage: FetchStage::Invoking, .. }
        ));
        assert!(matches!(
            report.pairs[2].outcome,
            PairOutcome::Failed { stage: FetchStage::Scanning, .. }
        ));
        assert_eq!(
            report.pairs[3].outcome,
            PairOutcome::Completed {
                url: "https://example/dog.jpg".to_string(),
                bytes: 23,
            }
        );
        // Downloader only sees pairs with a scanned URL.
        assert_eq!(downloader.calls.load(Ordering::SeqCst), 2);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failure_warning_names_destination() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        driver(
            Arc::new(FakeInvoker::new()),
            Arc::new(FakeDownloader::default()),
            Arc::new(RecordingSink::default()),
        )
        .run(&[BatchPair::new("axolotl", "pics/axolotl.jpg")])
        .await;

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("Pair failed"));
        assert!(text.contains("kind=axolotl"));
        assert!(text.contains("destination=pics/axolotl.jpg"));
    }

    #[tokio::test]
    async fn test_exit_failure_message_carries_stderr() {
        let report = driver(
            Arc::new(FakeInvoker::new()),
            Arc::new(FakeDownloader::default()),
            Arc::new(RecordingSink::default()),
        )
        .run(&[BatchPair::new("axolotl", "a.jpg")])
        .await;

        match &report.pairs[0].outcome {
            PairOutcome::Failed { error, .. } => assert!(error.contains("unknown kind axolotl")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_download_failure_is_recorded() {
        let downloader = Arc::new(FakeDownloader {
            fail: true,
            ..FakeDownloader::default()
        });
        let report = driver(
            Arc::new(FakeInvoker::new()),
            downloader,
            Arc::new(RecordingSink::default()),
        )
        .run(&[BatchPair::new("cat", "cat.jpg")])
        .await;

        assert!(matches!(
            report.pairs[0].outcome,
            PairOutcome::Failed { stage: FetchStage::Downloading, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let sink = Arc::new(RecordingSink::default());
        let report = driver(
            Arc::new(FakeInvoker::new()),
            Arc::new(FakeDownloader::default()),
            sink.clone(),
        )
        .run(&[])
        .await;

        assert_eq!(report.total(), 0);
        let events = sink.0.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                BatchEvent::Started { total: 0 },
                BatchEvent::Finished {
                    succeeded: 0,
                    failed: 0,
                },
            ]
        );
    }

    // ------------------------------------------------------------------------
    // Events and ordering
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_sequential_event_order() {
        let sink = Arc::new(RecordingSink::default());
        driver(
            Arc::new(FakeInvoker::new()),
            Arc::new(FakeDownloader::default()),
            sink.clone(),
        )
        .run(&[BatchPair::new("cat", "cat.jpg"), BatchPair::new("fox", "fox.jpg")])
        .await;

        let events = sink.0.lock().unwrap();
        let indices: Vec<Option<usize>> = events.iter().map(BatchEvent::pair_index).collect();
        assert_eq!(
            indices,
            vec![
                None,
                Some(0),
                Some(0),
                Some(0),
                Some(0),
                Some(0),
                Some(1),
                Some(1),
                Some(1),
                Some(1),
                None,
            ]
        );
        assert!(matches!(events[5], BatchEvent::PairCompleted { .. }));
        assert!(matches!(
            events[9],
            BatchEvent::PairFailed { stage: FetchStage::Scanning, .. }
        ));
    }

    #[tokio::test]
    async fn test_request_ids_follow_input_order() {
        let invoker = Arc::new(FakeInvoker::new());
        driver(
            invoker.clone(),
            Arc::new(FakeDownloader::default()),
            Arc::new(RecordingSink::default()),
        )
        .run(&[BatchPair::new("cat", "1.jpg"), BatchPair::new("dog", "2.jpg")])
        .await;

        let seen = invoker.seen.lock().unwrap();
        let ids: Vec<u64> = seen.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(seen[1].params.kind, PetKind::Dog);
    }

    #[tokio::test]
    async fn test_concurrent_run_keeps_report_order() {
        let invoker = Arc::new(FakeInvoker {
            seen: Mutex::new(Vec::new()),
            delay: Some(Duration::from_millis(5)),
        });
        let pairs: Vec<BatchPair> = ["cat", "dog", "cat", "dog"]
            .iter()
            .enumerate()
            .map(|(i, kind)| BatchPair::new(*kind, format!("{i}.jpg")))
            .collect();

        let report = driver(
            invoker,
            Arc::new(FakeDownloader::default()),
            Arc::new(RecordingSink::default()),
        )
        .with_concurrency(4)
        .run(&pairs)
        .await;

        assert_eq!(report.succeeded(), 4);
        let destinations: Vec<_> = report
            .pairs
            .iter()
            .map(|p| p.pair.destination.display().to_string())
            .collect();
        assert_eq!(destinations, vec!["0.jpg", "1.jpg", "2.jpg", "3.jpg"]);
    }

    #[test]
    fn test_concurrency_is_clamped() {
        let make = || {
            BatchDriver::new(
                RequestFactory::new("get_pet_image"),
                Arc::new(FakeInvoker::new()),
                Arc::new(FakeDownloader::default()),
            )
        };
        assert_eq!(make().with_concurrency(0).concurrency(), 1);
        assert_eq!(make().with_concurrency(99).concurrency(), MAX_CONCURRENCY);
        assert_eq!(make().concurrency(), 1);
    }

    #[tokio::test]
    async fn test_single_fetch() {
        let fetched = BatchDriver::new(
            RequestFactory::new("get_pet_image"),
            Arc::new(FakeInvoker::new()),
            Arc::new(FakeDownloader::default()),
        )
        .fetch(&BatchPair::new("cat", "cat.jpg"))
        .await
        .unwrap();

        assert_eq!(fetched.url.as_str(), "http://example/cat.jpg");
    }
}
