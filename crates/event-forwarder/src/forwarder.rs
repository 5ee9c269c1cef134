// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::service::service_fn;
use hyper::{body::Incoming, http, Method, Request, Response, StatusCode};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, error};

use log_ingestion::{Config, LogAnalyticsClient};

use crate::handlers::{self, Endpoint};
use crate::http_utils::{Body, HttpResponse};

const SALESFORCE_ENDPOINT_PATH: &str = "/api/salesforceloghandler";
const MULESOFT_ENDPOINT_PATH: &str = "/api/mulesoftloghandler";
const UNIVERSAL_ENDPOINT_PATH: &str = "/api/universalloghandler";
const INFO_ENDPOINT_PATH: &str = "/info";

pub struct Forwarder {
    pub config: Arc<Config>,
    intake: Option<Arc<LogAnalyticsClient>>,
}

impl Forwarder {
    /// Wires the forwarder up against the given configuration. When
    /// credentials are absent the server still starts; every forwarding
    /// attempt then fails with a per-request configuration error.
    pub fn new(config: Arc<Config>) -> Self {
        let intake = match LogAnalyticsClient::from_config(&config) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                error!("Log Analytics client unavailable ({e}), events will be rejected");
                None
            }
        };
        Forwarder { config, intake }
    }

    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.forwarder_port));
        let listener = TcpListener::bind(&addr).await?;
        debug!(
            "Forwarder started: listening on port {}",
            self.config.forwarder_port
        );
        self.run(listener).await
    }

    /// Serves connections from an already-bound listener. Split out from
    /// [`Forwarder::start`] so tests can bind an ephemeral port themselves.
    pub async fn run(&self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let config = Arc::clone(&self.config);
        let intake = self.intake.clone();

        let service = service_fn(move |req| {
            // called for each http request
            let config = Arc::clone(&config);
            let intake = intake.clone();
            Forwarder::endpoint_handler(config, intake, req)
        });

        Self::serve_tcp(listener, service).await
    }

    async fn serve_tcp<S>(listener: TcpListener, service: S) -> Result<(), Box<dyn std::error::Error>>
    where
        S: hyper::service::Service<Request<Incoming>, Response = HttpResponse>
            + Clone
            + Send
            + 'static,
        S::Future: Send,
        S::Error: std::error::Error + Send + Sync + 'static,
    {
        let server = hyper::server::conn::http1::Builder::new();
        let mut joinset = tokio::task::JoinSet::new();

        loop {
            let conn = tokio::select! {
                con_res = listener.accept() => match con_res {
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::ConnectionAborted
                                | io::ErrorKind::ConnectionReset
                                | io::ErrorKind::ConnectionRefused
                        ) =>
                    {
                        continue;
                    }
                    Err(e) => {
                        error!("Server error: {e}");
                        return Err(e.into());
                    }
                    Ok((conn, _)) => conn,
                },
                finished = async {
                    match joinset.join_next().await {
                        Some(finished) => finished,
                        None => std::future::pending().await,
                    }
                } => match finished {
                    Err(e) if e.is_panic() => {
                        // Don't kill server on panic - log and continue
                        error!("Connection handler panicked: {:?}", e);
                        continue;
                    },
                    Ok(()) | Err(_) => continue,
                },
            };
            let conn = hyper_util::rt::TokioIo::new(conn);
            let server = server.clone();
            let service = service.clone();
            joinset.spawn(async move {
                if let Err(e) = server.serve_connection(conn, service).await {
                    error!("Connection error: {e}");
                }
            });
        }
    }

    async fn endpoint_handler(
        config: Arc<Config>,
        intake: Option<Arc<LogAnalyticsClient>>,
        req: Request<Incoming>,
    ) -> http::Result<HttpResponse> {
        match (req.method(), req.uri().path()) {
            (&Method::POST, SALESFORCE_ENDPOINT_PATH) => {
                handlers::handle_event(config, intake, req, Endpoint::Salesforce).await
            }
            (&Method::POST, MULESOFT_ENDPOINT_PATH) => {
                handlers::handle_event(config, intake, req, Endpoint::Mulesoft).await
            }
            (&Method::POST, UNIVERSAL_ENDPOINT_PATH) => {
                handlers::handle_event(config, intake, req, Endpoint::Universal).await
            }
            (_, INFO_ENDPOINT_PATH) => {
                Self::info_handler(config.forwarder_port, intake.is_some())
            }
            _ => {
                let mut not_found = Response::default();
                *not_found.status_mut() = StatusCode::NOT_FOUND;
                Ok(not_found)
            }
        }
    }

    fn info_handler(forwarder_port: u16, workspace_configured: bool) -> http::Result<HttpResponse> {
        let response_json = json!(
            {
                "endpoints": [
                    SALESFORCE_ENDPOINT_PATH,
                    MULESOFT_ENDPOINT_PATH,
                    UNIVERSAL_ENDPOINT_PATH,
                    INFO_ENDPOINT_PATH
                ],
                "config": {
                    "receiver_port": forwarder_port,
                    "workspace_configured": workspace_configured
                }
            }
        );
        Response::builder()
            .status(200)
            .body(Body::from(response_json.to_string()))
    }
}
