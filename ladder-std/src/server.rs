//! A minimal HTTP/1 server for Ladder apps.
//!
//! Each accepted connection is served on its own task. Request bodies are
//! collected in full before dispatch; the response is written once the
//! dispatch completes.
//!
//! # Example
//!
//! ```rust,no_run
//! use ladder_core::App;
//! use ladder_std::{server, testing::Reply};
//!
//! # async fn run() -> Result<(), server::ServerError> {
//! let app = App::new().get("/", Reply::text("hello"));
//! server::listen("127.0.0.1:3000", app).await
//! # }
//! ```

use bytes::Bytes;
use futures::future::{BoxFuture, Future};
use http_body_util::{BodyExt, Full};
use hyper::{body::Incoming, server::conn::http1};
use hyper_util::rt::TokioIo;
use ladder_core::App;
use std::{io, sync::Arc};
use thiserror::Error;
use tokio::net::{TcpListener, ToSocketAddrs};

/// Errors raised by the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Binding or accepting failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(#[from] hyper::Error),
}

/// Bind `addr` and serve `app` until the process ends.
pub async fn listen(addr: impl ToSocketAddrs, app: App) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, Arc::new(app), futures::future::pending()).await
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
///
/// Connections accepted before shutdown keep running on their own tasks.
pub async fn serve(
    listener: TcpListener,
    app: Arc<App>,
    shutdown: impl Future<Output = ()>,
) -> Result<(), ServerError> {
    let http = http1::Builder::new();
    tracing::info!(addr = %listener.local_addr()?, "listening");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(error) => {
                        tracing::warn!(%error, "failed to accept connection");
                        continue;
                    }
                };

                let conn = http.serve_connection(
                    TokioIo::new(stream),
                    AppConnection {
                        app: Arc::clone(&app),
                    },
                );

                tokio::spawn(async move {
                    if let Err(error) = conn.await {
                        tracing::warn!(%peer_addr, %error, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                tracing::info!("shutting down");
                return Ok(());
            }
        }
    }
}

/// The per-connection hyper service.
#[derive(Clone)]
struct AppConnection {
    app: Arc<App>,
}

impl hyper::service::Service<http::Request<Incoming>> for AppConnection {
    type Response = http::Response<Full<Bytes>>;
    type Error = ServerError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn call(&self, request: http::Request<Incoming>) -> Self::Future {
        let app = Arc::clone(&self.app);
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let body = body.collect().await.map_err(ServerError::Body)?.to_bytes();
            let response = app.respond(http::Request::from_parts(parts, body)).await;
            Ok(response.map(Full::new))
        })
    }
}
