//! Pipeline runner: one extraction-and-parse unit of work per document.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{DocumentStore, StatusUpdate, TextSource, TransactionSink};
use crate::error::{PdfError, PipelineError};
use crate::models::{BankscanConfig, FailureReason};
use crate::statement::StatementParser;

/// Runs the extraction-and-parse pipeline for stored documents.
///
/// Generic over its collaborators: the document store, the transaction sink,
/// and the text source (the PDF extractor in production).
pub struct DocumentPipeline<S, T, E> {
    store: S,
    sink: T,
    text_source: Arc<E>,
    parser: StatementParser,
    config: BankscanConfig,
    permits: Semaphore,
    in_flight: Mutex<HashSet<u64>>,
}

impl<S, T, E> DocumentPipeline<S, T, E>
where
    S: DocumentStore,
    T: TransactionSink,
    E: TextSource + 'static,
{
    pub fn new(store: S, sink: T, text_source: E, config: BankscanConfig) -> Self {
        let permits = Semaphore::new(config.pipeline.max_concurrent.max(1));
        Self {
            store,
            sink,
            text_source: Arc::new(text_source),
            parser: StatementParser::new(),
            config,
            permits,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Run one processing attempt for the document.
    ///
    /// Concurrent attempts for the same document are rejected with
    /// [`PipelineError::AlreadyProcessing`]; attempts for distinct documents
    /// queue on the pipeline's semaphore once `max_concurrent` runs are in
    /// flight. On success returns the number of transactions persisted,
    /// which may legitimately be zero.
    pub async fn process(&self, document_id: u64) -> Result<u32, PipelineError> {
        let _claim = self.claim(document_id)?;
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("pipeline semaphore closed");

        let document = self.store.document(document_id).await?;
        debug!(document_id, path = %document.file_path, "processing document");

        let text = match self.extract(PathBuf::from(&document.file_path)).await {
            Ok(text) => text,
            Err(err) => {
                self.mark_failed(document_id, failure_reason(&err)).await;
                return Err(err);
            }
        };

        // Parsing is pure and CPU-bound; per-line mismatches are silent.
        let transactions = self.parser.parse(&text);

        // Persistence failures propagate without forcing the status to
        // failed: the run is not-completed, not failed.
        let stored = self.sink.create_bulk(&transactions).await?;
        let count = stored.len() as u32;
        self.store
            .update_status(document_id, StatusUpdate::processed(count))
            .await?;

        info!(document_id, count, "document processed");
        Ok(count)
    }

    /// Fire-and-forget variant for processing right after upload.
    pub fn spawn(self: Arc<Self>, document_id: u64) -> JoinHandle<Result<u32, PipelineError>>
    where
        S: 'static,
        T: 'static,
    {
        tokio::spawn(async move {
            let result = self.process(document_id).await;
            if let Err(err) = &result {
                warn!(document_id, error = %err, "background processing failed");
            }
            result
        })
    }

    /// Text extraction runs on the blocking pool under the configured time
    /// budget. A run that exceeds the budget is marked failed; the blocking
    /// task itself cannot be interrupted and is left to finish detached.
    async fn extract(&self, path: PathBuf) -> Result<String, PipelineError> {
        let timeout_secs = self.config.pdf.extraction_timeout_secs;
        let source = Arc::clone(&self.text_source);
        let task = tokio::task::spawn_blocking(move || source.statement_text(&path));

        match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
            Err(_) => Err(PipelineError::Timeout(timeout_secs)),
            Ok(Err(join_err)) => Err(PipelineError::Extraction(PdfError::TextExtraction(
                join_err.to_string(),
            ))),
            Ok(Ok(Err(pdf_err))) => Err(PipelineError::Extraction(pdf_err)),
            Ok(Ok(Ok(text))) => Ok(text),
        }
    }

    async fn mark_failed(&self, document_id: u64, reason: FailureReason) {
        if let Err(err) = self
            .store
            .update_status(document_id, StatusUpdate::failed(reason))
            .await
        {
            warn!(document_id, error = %err, "failed to record failure status");
        }
    }

    fn claim(&self, document_id: u64) -> Result<FlightClaim<'_>, PipelineError> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(document_id) {
            return Err(PipelineError::AlreadyProcessing(document_id));
        }
        Ok(FlightClaim {
            in_flight: &self.in_flight,
            document_id,
        })
    }
}

fn failure_reason(err: &PipelineError) -> FailureReason {
    match err {
        PipelineError::Timeout(seconds) => FailureReason::Timeout { seconds: *seconds },
        other => FailureReason::Extraction {
            detail: other.to_string(),
        },
    }
}

/// Single-flight claim on a document id, released on drop.
struct FlightClaim<'a> {
    in_flight: &'a Mutex<HashSet<u64>>,
    document_id: u64,
}

impl Drop for FlightClaim<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.document_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SinkError, StoreError};
    use crate::models::{ParsedTransaction, ProcessingStatus, StoredDocument, StoredTransaction};
    use crate::pdf;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::Path;

    struct MemoryStore {
        documents: Mutex<HashMap<u64, StoredDocument>>,
    }

    impl MemoryStore {
        fn with_document(id: u64) -> Self {
            let mut documents = HashMap::new();
            documents.insert(
                id,
                StoredDocument {
                    id,
                    file_name: "statement.pdf".into(),
                    file_path: format!("/uploads/{}.pdf", id),
                    file_type: "application/pdf".into(),
                    file_size_bytes: 1024,
                    uploaded_at: Utc::now(),
                    status: ProcessingStatus::unprocessed(),
                },
            );
            Self {
                documents: Mutex::new(documents),
            }
        }

        fn empty() -> Self {
            Self {
                documents: Mutex::new(HashMap::new()),
            }
        }

        fn status(&self, id: u64) -> ProcessingStatus {
            self.documents.lock().unwrap()[&id].status.clone()
        }
    }

    impl DocumentStore for MemoryStore {
        async fn document(&self, id: u64) -> Result<StoredDocument, StoreError> {
            self.documents
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound(id))
        }

        async fn update_status(
            &self,
            id: u64,
            update: StatusUpdate,
        ) -> Result<StoredDocument, StoreError> {
            let mut documents = self.documents.lock().unwrap();
            let document = documents.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            if update.is_processed {
                document
                    .status
                    .mark_processed(update.transaction_count.unwrap_or(0));
            } else if let Some(reason) = update.failure {
                document.status.mark_failed(reason);
            }
            Ok(document.clone())
        }
    }

    struct MemorySink {
        stored: Mutex<Vec<StoredTransaction>>,
        fail: bool,
    }

    impl MemorySink {
        fn new() -> Self {
            Self {
                stored: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                stored: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    impl TransactionSink for MemorySink {
        async fn create_bulk(
            &self,
            transactions: &[ParsedTransaction],
        ) -> Result<Vec<StoredTransaction>, SinkError> {
            if self.fail {
                return Err(SinkError::Backend("database unavailable".into()));
            }
            let mut stored = self.stored.lock().unwrap();
            let start = stored.len() as u64;
            let batch: Vec<StoredTransaction> = transactions
                .iter()
                .enumerate()
                .map(|(i, t)| StoredTransaction {
                    id: start + i as u64 + 1,
                    transaction: t.clone(),
                })
                .collect();
            stored.extend(batch.clone());
            Ok(batch)
        }
    }

    enum FakeSource {
        Text(String),
        Fail,
        Slow,
    }

    impl TextSource for FakeSource {
        fn statement_text(&self, _path: &Path) -> pdf::Result<String> {
            match self {
                FakeSource::Text(text) => Ok(text.clone()),
                FakeSource::Fail => Err(PdfError::TextExtraction("corrupt stream".into())),
                FakeSource::Slow => {
                    std::thread::sleep(Duration::from_millis(500));
                    Ok(String::new())
                }
            }
        }
    }

    const STATEMENT: &str = "\
Tue, Oct. 14, 2025 -$45.67
Grocery Store
Wed, Oct. 15, 2025 +$100.00
Payroll
10/20/2025 Coffee Shop $4.50
";

    fn pipeline(
        store: MemoryStore,
        sink: MemorySink,
        source: FakeSource,
    ) -> DocumentPipeline<MemoryStore, MemorySink, FakeSource> {
        DocumentPipeline::new(store, sink, source, BankscanConfig::default())
    }

    #[tokio::test]
    async fn test_successful_run_sets_count() {
        let p = pipeline(
            MemoryStore::with_document(1),
            MemorySink::new(),
            FakeSource::Text(STATEMENT.into()),
        );

        let count = p.process(1).await.unwrap();
        // Withdrawal + generic line; the deposit line is discarded
        assert_eq!(count, 2);

        let status = p.store.status(1);
        assert!(status.is_processed);
        assert_eq!(status.transaction_count, Some(2));
        assert!(status.processed_at.is_some());
        assert_eq!(p.sink.stored.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_count_success() {
        let p = pipeline(
            MemoryStore::with_document(1),
            MemorySink::new(),
            FakeSource::Text(String::new()),
        );

        let count = p.process(1).await.unwrap();
        assert_eq!(count, 0);

        let status = p.store.status(1);
        assert!(status.is_processed);
        assert_eq!(status.transaction_count, Some(0));
    }

    #[tokio::test]
    async fn test_extraction_failure_marks_failed_with_reason() {
        let p = pipeline(
            MemoryStore::with_document(1),
            MemorySink::new(),
            FakeSource::Fail,
        );

        let err = p.process(1).await.unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(_)));

        let status = p.store.status(1);
        assert!(!status.is_processed);
        assert_eq!(status.transaction_count, None);
        assert!(matches!(
            status.last_failure,
            Some(FailureReason::Extraction { .. })
        ));
    }

    #[tokio::test]
    async fn test_extraction_timeout_marks_failed() {
        let mut config = BankscanConfig::default();
        config.pdf.extraction_timeout_secs = 0;
        let p = DocumentPipeline::new(
            MemoryStore::with_document(1),
            MemorySink::new(),
            FakeSource::Slow,
            config,
        );

        let err = p.process(1).await.unwrap_err();
        assert!(matches!(err, PipelineError::Timeout(0)));

        let status = p.store.status(1);
        assert!(!status.is_processed);
        assert!(matches!(
            status.last_failure,
            Some(FailureReason::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let p = pipeline(
            MemoryStore::empty(),
            MemorySink::new(),
            FakeSource::Text(String::new()),
        );

        let err = p.process(42).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Store(StoreError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_sink_failure_leaves_status_untouched() {
        let p = pipeline(
            MemoryStore::with_document(1),
            MemorySink::failing(),
            FakeSource::Text(STATEMENT.into()),
        );

        let err = p.process(1).await.unwrap_err();
        assert!(matches!(err, PipelineError::Sink(_)));

        // Not-completed, not failed: status stays whatever it was
        assert_eq!(p.store.status(1), ProcessingStatus::unprocessed());
    }

    #[tokio::test]
    async fn test_same_document_single_flight() {
        let p = pipeline(
            MemoryStore::with_document(1),
            MemorySink::new(),
            FakeSource::Text(String::new()),
        );

        let claim = p.claim(1).unwrap();
        let err = p.process(1).await.unwrap_err();
        assert!(matches!(err, PipelineError::AlreadyProcessing(1)));

        // Released claim lets the next attempt through
        drop(claim);
        assert!(p.process(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_detached_spawn_completes() {
        let p = Arc::new(pipeline(
            MemoryStore::with_document(1),
            MemorySink::new(),
            FakeSource::Text(STATEMENT.into()),
        ));

        let handle = Arc::clone(&p).spawn(1);
        let count = handle.await.unwrap().unwrap();
        assert_eq!(count, 2);
        assert!(p.store.status(1).is_processed);
    }

    #[tokio::test]
    async fn test_reprocess_overwrites_previous_outcome() {
        let p = pipeline(
            MemoryStore::with_document(1),
            MemorySink::new(),
            FakeSource::Text(STATEMENT.into()),
        );

        assert_eq!(p.process(1).await.unwrap(), 2);
        assert_eq!(p.process(1).await.unwrap(), 2);

        // Status is overwritten per run, not appended to a history
        let status = p.store.status(1);
        assert_eq!(status.transaction_count, Some(2));
        // The sink, by contrast, accumulates: no dedup is performed here
        assert_eq!(p.sink.stored.lock().unwrap().len(), 4);
    }
}
