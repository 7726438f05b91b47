use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::transport::{Transport, TransportError};

/// In-memory transport for tests: records every send, optionally failing some codes.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
    failing: HashSet<String>,
}

impl RecordingTransport {
    #[must_use]
    pub fn failing(codes: &[&str]) -> Self {
        Self {
            sent: Mutex::default(),
            failing: codes.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn codes(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, code)| code.clone())
            .collect()
    }

    pub fn remotes(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(remote, _)| remote.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_command(&self, remote: &str, code: &str) -> Result<(), TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push((remote.to_string(), code.to_string()));

        if self.failing.contains(code) {
            return Err(TransportError::Unreachable(
                remote.to_string(),
                "simulated failure".to_string(),
            ));
        }
        Ok(())
    }
}
