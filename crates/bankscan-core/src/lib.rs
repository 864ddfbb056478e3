//! Core library for bank statement import.
//!
//! This crate provides:
//! - PDF text extraction (page order preserved, all-or-nothing per document)
//! - Heuristic transaction parsing from unstructured statement text
//! - Per-document processing status lifecycle
//! - A bounded, single-flight processing pipeline over pluggable
//!   document-store and transaction-sink collaborators

pub mod error;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod statement;

pub use error::{BankscanError, PdfError, PipelineError, Result, SinkError, StoreError};
pub use models::{
    BankscanConfig, FailureReason, ParsedTransaction, ProcessingStatus, StoredDocument,
    StoredTransaction,
};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pipeline::{
    DocumentPipeline, DocumentStore, PdfTextSource, StatusUpdate, TextSource, TransactionSink,
};
pub use statement::{GenericDateInterpreter, LineInterpreter, NamedDateInterpreter, StatementParser};
