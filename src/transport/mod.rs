pub mod hass;
#[cfg(test)]
pub mod recording;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Remote {0:?} not reachable: {1}")]
    Unreachable(String, String),

    #[error("Remote {remote:?} rejected command: {details}")]
    Rejected { remote: String, details: String },
}

/// Something that can replay a named IR code on a remote.
///
/// Implementations must not return until the remote side has processed the
/// command (or failed), so repeated sends stay strictly sequential.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_command(&self, remote: &str, code: &str) -> Result<(), TransportError>;
}
