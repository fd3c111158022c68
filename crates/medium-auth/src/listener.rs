//! One-shot callback listener
//!
//! The negotiation needs exactly one capability from the network: hand over
//! the next inbound callback request, accept a status code for it, and shut
//! down when done. `CallbackSource` captures that capability;
//! `LocalCallbackListener` implements it with an axum server bound to the
//! redirect URI's host and port.
//!
//! Each inbound request is forwarded over a channel together with a oneshot
//! responder. The HTTP response is only written once the negotiation has
//! decided on a status, which happens after any token exchange completes.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::time::Duration;

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::routing::any;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::redirect::RedirectTarget;

/// Upper bound on waiting for in-flight responses after shutdown is requested
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// The parts of an inbound callback request the negotiation looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    pub method: Method,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
}

/// An inbound callback awaiting its response status.
#[derive(Debug)]
pub struct PendingCallback {
    pub request: CallbackRequest,
    responder: oneshot::Sender<StatusCode>,
}

impl PendingCallback {
    /// Pair a request with the receiver its status will be delivered on.
    pub fn new(request: CallbackRequest) -> (Self, oneshot::Receiver<StatusCode>) {
        let (responder, reply) = oneshot::channel();
        (Self { request, responder }, reply)
    }

    /// Answer the request. A client that already went away is not an error.
    pub fn respond(self, status: StatusCode) {
        let _ = self.responder.send(status);
    }
}

/// Source of callback requests for a single negotiation.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility.
pub trait CallbackSource: Send {
    /// Next inbound callback, or `None` once the source is closed.
    fn next_callback(&mut self) -> Pin<Box<dyn Future<Output = Option<PendingCallback>> + Send + '_>>;

    /// Stop accepting callbacks and release the underlying resources.
    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// axum-backed callback listener on the redirect URI's host and port.
pub struct LocalCallbackListener {
    local_addr: SocketAddr,
    callbacks: mpsc::Receiver<PendingCallback>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<std::io::Result<()>>>,
}

impl LocalCallbackListener {
    /// Bind the listener and start serving the callback route.
    ///
    /// Fails with `Error::Bind` when the address is unavailable.
    pub async fn bind(target: &RedirectTarget) -> Result<Self> {
        let addr = target.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| Error::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;

        let (tx, callbacks) = mpsc::channel(1);
        let app = callback_router(target.path(), tx);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(addr = %local_addr, path = target.path(), "callback listener bound");

        Ok(Self {
            local_addr,
            callbacks,
            shutdown_tx: Some(shutdown_tx),
            server: Some(server),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn reject_queued(&mut self) {
        self.callbacks.close();
        while let Ok(pending) = self.callbacks.try_recv() {
            pending.respond(StatusCode::SERVICE_UNAVAILABLE);
        }
    }
}

impl CallbackSource for LocalCallbackListener {
    fn next_callback(&mut self) -> Pin<Box<dyn Future<Output = Option<PendingCallback>> + Send + '_>> {
        Box::pin(self.callbacks.recv())
    }

    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.reject_queued();

            if let Some(tx) = self.shutdown_tx.take() {
                let _ = tx.send(());
            }

            let Some(server) = self.server.take() else {
                return;
            };

            match tokio::time::timeout(DRAIN_TIMEOUT, server).await {
                Ok(Ok(Ok(()))) => debug!(addr = %self.local_addr, "callback listener stopped"),
                Ok(Ok(Err(e))) => error!(error = %e, "callback listener error during shutdown"),
                Ok(Err(e)) => error!(error = %e, "callback listener task panicked"),
                Err(_) => warn!(
                    drain_timeout_secs = DRAIN_TIMEOUT.as_secs(),
                    "callback listener drain timeout exceeded"
                ),
            }
        })
    }
}

impl Drop for LocalCallbackListener {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}

/// Build the callback router: every method on `path`, one request at a time.
fn callback_router(path: &str, tx: mpsc::Sender<PendingCallback>) -> Router {
    Router::new()
        .route(path, any(handle_callback))
        .layer(tower::limit::ConcurrencyLimitLayer::new(1))
        .with_state(tx)
}

async fn handle_callback(
    State(tx): State<mpsc::Sender<PendingCallback>>,
    method: Method,
    RawQuery(query): RawQuery,
) -> StatusCode {
    debug!(%method, has_query = query.is_some(), "callback request received");

    let (pending, reply) = PendingCallback::new(CallbackRequest { method, query });
    if tx.send(pending).await.is_err() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    reply.await.unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
}
