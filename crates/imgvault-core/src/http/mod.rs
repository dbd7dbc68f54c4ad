//! HTTP surface shared by the three services.
//!
//! A small hyper 1.x server: one task per connection, every reply a JSON
//! [`Envelope`]. Each service contributes a [`Routes`] implementation; the
//! server adds `GET /health` and a 404 envelope for anything unrouted.

mod storage;
mod transform;

pub use storage::StorageRoutes;
pub use transform::{ResizeRoutes, RotateRoutes};

use async_trait::async_trait;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

use crate::envelope::Envelope;

/// A fully-read request, as handed to [`Routes::dispatch`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub peer: SocketAddr,
}

impl ApiRequest {
    /// First value of a query parameter, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Request routing for one service.
#[async_trait]
pub trait Routes: Send + Sync + 'static {
    /// Service name, reported by `/health` and in logs.
    fn name(&self) -> &'static str;

    /// Largest accepted request body, in bytes.
    fn body_limit(&self) -> usize {
        1024 * 1024
    }

    /// Reply for a request whose body is over [`Routes::body_limit`].
    fn body_too_large(&self) -> Envelope {
        Envelope::failure(format!(
            "Request body exceeds {} bytes",
            self.body_limit()
        ))
    }

    /// Handle a request, or return `None` if no route matches.
    async fn dispatch(&self, request: ApiRequest) -> Option<Envelope>;
}

/// Handle to a running server that can be used to stop it.
pub struct ServerHandle {
    shutdown_tx: oneshot::Sender<()>,
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL for clients.
    pub fn url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}

/// Start serving `routes` on `host:port`.
///
/// Use port 0 to get a random available port.
pub async fn start_server<R: Routes>(
    host: &str,
    port: u16,
    routes: Arc<R>,
) -> std::io::Result<ServerHandle> {
    let listener = TcpListener::bind((host, port)).await?;
    let local_addr = listener.local_addr()?;

    info!("Starting {} service on {}", routes.name(), local_addr);

    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutting down {} service", routes.name());
                    break;
                }
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let io = TokioIo::new(stream);
                            let routes = routes.clone();

                            tokio::spawn(async move {
                                if let Err(err) = http1::Builder::new()
                                    .serve_connection(
                                        io,
                                        hyper::service::service_fn(move |req| {
                                            let routes = routes.clone();
                                            async move { handle(routes, req, peer).await }
                                        }),
                                    )
                                    .await
                                {
                                    tracing::error!("Error serving connection: {:?}", err);
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }
    });

    Ok(ServerHandle {
        shutdown_tx,
        local_addr,
        task,
    })
}

async fn handle<R: Routes>(
    routes: Arc<R>,
    req: Request<Incoming>,
    peer: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    tracing::debug!("{} {} from {}", parts.method, parts.uri, peer);

    let body = match Limited::new(body, routes.body_limit()).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::warn!("Rejected request body from {peer}: {e}");
            let envelope = if e.is::<LengthLimitError>() {
                routes.body_too_large()
            } else {
                Envelope::failure("Request body could not be read")
            };
            return Ok(envelope_response(StatusCode::OK, &envelope));
        }
    };

    let request = ApiRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        content_type: parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
        peer,
    };

    if request.method == Method::GET && request.path == "/health" {
        let envelope = Envelope::ok(json!({ "service": routes.name() }));
        return Ok(envelope_response(StatusCode::OK, &envelope));
    }

    let response = match routes.dispatch(request).await {
        Some(envelope) => envelope_response(StatusCode::OK, &envelope),
        None => envelope_response(StatusCode::NOT_FOUND, &Envelope::failure("Route not found")),
    };
    Ok(response)
}

fn envelope_response(status: StatusCode, envelope: &Envelope) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(envelope.to_json())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
