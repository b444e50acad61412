//! Unix-socket transport for the indexing service.
//!
//! Each request opens its own connection: category fetches run concurrently
//! on one client, and a fresh stream per round trip avoids multiplexing
//! frames on a shared socket. Connect and request timeouts live here; the
//! orchestration layer never sets its own.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::debug;

use super::protocol::{
    ErrorCode, FramedMessage, HealthStatus, PROTOCOL_VERSION, Request, Response, decode_message,
    default_socket_path, encode_message,
};
use super::{
    BackendError, ContentHit, DirectoryHit, FileHit, IndexerBackend, StatusSnapshot,
};

/// Responses larger than this are treated as protocol corruption.
const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub socket_path: PathBuf,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl RemoteConfig {
    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(path) = dotenvy::var("DESKSEEK_SOCKET") {
            cfg.socket_path = PathBuf::from(path);
        }

        if let Ok(val) = dotenvy::var("DESKSEEK_CONNECT_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            cfg.connect_timeout = Duration::from_millis(ms);
        }

        if let Ok(val) = dotenvy::var("DESKSEEK_REQUEST_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            cfg.request_timeout = Duration::from_millis(ms);
        }

        cfg
    }
}

/// Unix-socket client for the indexing service.
pub struct RemoteBackend {
    config: RemoteConfig,
    request_counter: AtomicU64,
}

impl RemoteBackend {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            request_counter: AtomicU64::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RemoteConfig::from_env())
    }

    /// Liveness check against the service.
    pub async fn health(&self) -> Result<HealthStatus, BackendError> {
        match self.call(Request::Health).await? {
            Response::Health(status) => Ok(status),
            other => Err(unexpected(&other)),
        }
    }

    async fn call(&self, request: Request) -> Result<Response, BackendError> {
        let request_id = format!(
            "deskseek-{}",
            self.request_counter.fetch_add(1, Ordering::Relaxed)
        );
        let msg = FramedMessage::new(&request_id, request);
        let encoded = encode_message(&msg).map_err(|e| BackendError::Protocol(e.to_string()))?;

        let mut stream =
            tokio::time::timeout(self.config.connect_timeout, UnixStream::connect(&self.config.socket_path))
                .await
                .map_err(|_| {
                    BackendError::Timeout(format!(
                        "connect to {}",
                        self.config.socket_path.display()
                    ))
                })?
                .map_err(|e| {
                    BackendError::Unavailable(format!(
                        "{}: {}",
                        self.config.socket_path.display(),
                        e
                    ))
                })?;

        let response = tokio::time::timeout(
            self.config.request_timeout,
            Self::round_trip(&mut stream, &encoded),
        )
        .await
        .map_err(|_| BackendError::Timeout(request_id.clone()))??;

        if response.version != PROTOCOL_VERSION {
            return Err(BackendError::Protocol(format!(
                "protocol version mismatch: expected {}, got {}",
                PROTOCOL_VERSION, response.version
            )));
        }
        debug!(request_id = %request_id, "backend round trip complete");

        match response.payload {
            Response::Error(err) => Err(match err.code {
                ErrorCode::Timeout => BackendError::Timeout(err.message),
                ErrorCode::Rejected | ErrorCode::InvalidInput => {
                    BackendError::Rejected(err.message)
                }
                ErrorCode::VersionMismatch => BackendError::Protocol(err.message),
                ErrorCode::Internal => BackendError::Unavailable(err.message),
            }),
            other => Ok(other),
        }
    }

    async fn round_trip(
        stream: &mut UnixStream,
        encoded: &[u8],
    ) -> Result<FramedMessage<Response>, BackendError> {
        stream
            .write_all(encoded)
            .await
            .map_err(|e| BackendError::Unavailable(format!("send failed: {}", e)))?;

        let mut len_buf = [0u8; 4];
        stream
            .read_exact(&mut len_buf)
            .await
            .map_err(|e| BackendError::Unavailable(format!("read failed: {}", e)))?;
        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_RESPONSE_BYTES {
            return Err(BackendError::Protocol(format!(
                "response too large: {} bytes",
                len
            )));
        }

        let mut payload = vec![0u8; len];
        stream
            .read_exact(&mut payload)
            .await
            .map_err(|e| BackendError::Unavailable(format!("read failed: {}", e)))?;

        decode_message(&payload).map_err(|e| BackendError::Protocol(e.to_string()))
    }
}

fn unexpected(response: &Response) -> BackendError {
    BackendError::Protocol(format!("unexpected response: {:?}", response))
}

impl IndexerBackend for RemoteBackend {
    async fn search_directories(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<DirectoryHit>, BackendError> {
        match self
            .call(Request::SearchDirectories {
                query: query.to_string(),
                offset,
                limit,
            })
            .await?
        {
            Response::Directories(hits) => Ok(hits),
            other => Err(unexpected(&other)),
        }
    }

    async fn search_files(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<FileHit>, BackendError> {
        match self
            .call(Request::SearchFiles {
                query: query.to_string(),
                offset,
                limit,
            })
            .await?
        {
            Response::Files(hits) => Ok(hits),
            other => Err(unexpected(&other)),
        }
    }

    async fn search_items(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ContentHit>, BackendError> {
        match self
            .call(Request::SearchItems {
                query: query.to_string(),
                offset,
                limit,
            })
            .await?
        {
            Response::Items(hits) => Ok(hits),
            other => Err(unexpected(&other)),
        }
    }

    async fn get_status(&self) -> Result<StatusSnapshot, BackendError> {
        match self.call(Request::GetStatus).await? {
            Response::Status(snap) => Ok(snap),
            other => Err(unexpected(&other)),
        }
    }

    async fn get_index_dir_paths(&self) -> Result<Vec<String>, BackendError> {
        match self.call(Request::GetIndexDirPaths).await? {
            Response::IndexDirPaths(paths) => Ok(paths),
            other => Err(unexpected(&other)),
        }
    }

    async fn add_index_path(&self, path: &str) -> Result<(), BackendError> {
        match self
            .call(Request::AddIndexPath {
                path: path.to_string(),
            })
            .await?
        {
            Response::Ack => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    async fn del_index_path(&self, path: &str) -> Result<(), BackendError> {
        match self
            .call(Request::DelIndexPath {
                path: path.to_string(),
            })
            .await?
        {
            Response::Ack => Ok(()),
            other => Err(unexpected(&other)),
        }
    }
}
