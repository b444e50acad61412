//! Wire format for the indexing service socket.
//!
//! Requests and responses travel as length-prefixed MessagePack frames over
//! a Unix domain socket: a 4-byte big-endian payload length followed by the
//! serialized [`FramedMessage`]. Every request carries a correlation id and
//! the protocol version so a mismatched client and service fail loudly
//! instead of misparsing each other.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ContentHit, DirectoryHit, FileHit, StatusSnapshot};

/// Protocol version for compatibility checks.
pub const PROTOCOL_VERSION: u32 = 1;

/// Default socket path, namespaced per user.
pub fn default_socket_path() -> std::path::PathBuf {
    let user = std::env::var("USER").unwrap_or_else(|_| "unknown".into());
    // Keep only alphanumeric, dash, underscore to prevent path traversal.
    let safe_user: String = user
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(64)
        .collect();
    let safe_user = if safe_user.is_empty() {
        "unknown".to_string()
    } else {
        safe_user
    };
    std::path::PathBuf::from(format!("/tmp/deskseek-index-{}.sock", safe_user))
}

/// Commands accepted by the indexing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Request {
    /// Liveness check.
    Health,

    SearchDirectories {
        query: String,
        offset: usize,
        limit: usize,
    },

    SearchFiles {
        query: String,
        offset: usize,
        limit: usize,
    },

    SearchItems {
        query: String,
        offset: usize,
        limit: usize,
    },

    GetStatus,

    GetIndexDirPaths,

    AddIndexPath { path: String },

    DelIndexPath { path: String },
}

/// Responses from the indexing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    Health(HealthStatus),

    Directories(Vec<DirectoryHit>),

    Files(Vec<FileHit>),

    Items(Vec<ContentHit>),

    Status(StatusSnapshot),

    IndexDirPaths(Vec<String>),

    /// Acknowledgement for configuration mutations.
    Ack,

    Error(ErrorResponse),
}

/// Liveness payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub uptime_secs: u64,
    pub version: u32,
    /// Whether the index is open and queryable.
    pub ready: bool,
}

/// Error payload from the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unknown or internal service error.
    Internal,
    /// Invalid request parameters.
    InvalidInput,
    /// The request was understood but refused (e.g. unknown index path).
    Rejected,
    /// The service timed out executing the request.
    Timeout,
    /// Protocol version mismatch.
    VersionMismatch,
}

/// Envelope for every frame on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramedMessage<T> {
    pub version: u32,
    /// Correlation id for logging; echoed back by the service.
    pub request_id: String,
    pub payload: T,
}

impl<T> FramedMessage<T> {
    pub fn new(request_id: impl Into<String>, payload: T) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            request_id: request_id.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("encode error: {0}")]
pub struct EncodeError(pub String);

#[derive(Debug, Clone, Error)]
#[error("decode error: {0}")]
pub struct DecodeError(pub String);

/// Encode a message to MessagePack bytes with the length prefix attached.
pub fn encode_message<T: Serialize>(msg: &FramedMessage<T>) -> Result<Vec<u8>, EncodeError> {
    let payload = rmp_serde::to_vec(msg).map_err(|e| EncodeError(e.to_string()))?;
    let len = payload.len() as u32;
    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode a message from MessagePack bytes (without the length prefix).
pub fn decode_message<T: for<'de> Deserialize<'de>>(
    data: &[u8],
) -> Result<FramedMessage<T>, DecodeError> {
    rmp_serde::from_slice(data).map_err(|e| DecodeError(e.to_string()))
}
