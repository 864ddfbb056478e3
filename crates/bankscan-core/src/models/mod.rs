//! Data models for documents, transactions, and configuration.

pub mod config;
pub mod document;
pub mod transaction;

pub use config::{BankscanConfig, PdfConfig, PipelineConfig};
pub use document::{FailureReason, ProcessingStatus, StoredDocument};
pub use transaction::{ParsedTransaction, StoredTransaction};
