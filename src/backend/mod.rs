//! Command boundary to the indexing service.
//!
//! The indexing backend (directory walking, OCR, document parsing, index
//! storage, file watching) runs out of process. This module defines the
//! command contract the client consumes:
//!
//! - **[`IndexerBackend`]**: the async operation set (paged category
//!   searches, status query, index-path configuration).
//! - **[`protocol`]**: the framed MessagePack wire format.
//! - **[`remote`]**: the Unix-socket transport implementing the trait.
//!
//! Orchestration code depends only on the trait, so tests substitute a
//! scripted backend without touching any transport.

pub mod protocol;
pub mod remote;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by backend operations.
///
/// The orchestration layer treats every variant uniformly as a failed
/// fetch; the distinction only matters for logging and CLI messages.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("backend rejected request: {0}")]
    Rejected(String),
}

/// A directory match from the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryHit {
    pub path: String,
}

/// A file match from the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileHit {
    pub path: String,
}

/// A content match: one indexed unit of text (a line of a text file, an
/// OCR block of a scanned page) together with its location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentHit {
    /// Directory containing the source file.
    pub dir: String,
    /// File name within `dir`.
    pub filename: String,
    pub page: u64,
    pub line: u64,
    pub content: String,
}

/// Background task counters reported by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStatusStat {
    pub pending: usize,
    pub running: usize,
    pub failed: usize,
    pub running_tasks: Vec<String>,
    pub failed_tasks: Vec<String>,
}

/// Index size counters reported by the backend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexStatusStat {
    pub directories: usize,
    pub files: usize,
    pub items: usize,
}

/// Full status payload of a `get_status` round trip. Replaced wholesale on
/// every poll; never merged field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub task_status_stat: TaskStatusStat,
    pub index_status_stat: IndexStatusStat,
}

/// The async command contract with the indexing service.
///
/// Search operations page with `(offset, limit)` and must return stable
/// ordering for a fixed query, so repeated calls with increasing offsets
/// neither skip nor duplicate hits (assuming no index mutation in between).
/// Timeout policy belongs to the implementing transport.
#[allow(async_fn_in_trait)]
pub trait IndexerBackend {
    async fn search_directories(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<DirectoryHit>, BackendError>;

    async fn search_files(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<FileHit>, BackendError>;

    async fn search_items(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ContentHit>, BackendError>;

    /// Idempotent, side-effect-free status query.
    async fn get_status(&self) -> Result<StatusSnapshot, BackendError>;

    async fn get_index_dir_paths(&self) -> Result<Vec<String>, BackendError>;

    async fn add_index_path(&self, path: &str) -> Result<(), BackendError>;

    async fn del_index_path(&self, path: &str) -> Result<(), BackendError>;
}
