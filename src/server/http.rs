use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::error::ApiResult;

pub struct HttpServer {
    addr: SocketAddr,
    svc: Router,
    handle: Handle,
}

impl HttpServer {
    #[must_use]
    pub fn http(addr: SocketAddr, svc: Router) -> Self {
        Self {
            addr,
            svc,
            handle: Handle::new(),
        }
    }

    /// Handle that can stop the server from another task.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    pub async fn run(self) -> ApiResult<()> {
        log::info!("Opening listen port on {}", self.addr);
        axum_server::bind(self.addr)
            .handle(self.handle)
            .serve(self.svc.into_make_service())
            .await?;
        log::info!("Stopped server {}", self.addr);
        Ok(())
    }
}

pub fn signal_stop(handle: &Handle) {
    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}
