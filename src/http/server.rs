//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, metrics)
//! - Bind the configured address when started by the harness
//! - Stop accepting and drain when asked to stop

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::routes::{route_table, RouteInfo, HEALTH_PATH, HELLO_PATH, METRICS_PATH};
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;

/// HTTP listener served by axum.
pub struct HttpServer {
    router: Router,
    routes: Vec<RouteInfo>,
    bind_address: String,
    stop: CancellationToken,
    started: AtomicBool,
    local_addr: Arc<OnceLock<SocketAddr>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// `/metrics` is served only when a Prometheus handle is supplied.
    pub fn new(config: &ServiceConfig, metrics_handle: Option<PrometheusHandle>) -> Self {
        let routes = route_table(metrics_handle.is_some());
        let router = Self::build_router(config, metrics_handle);
        Self {
            router,
            routes,
            bind_address: config.listener.bind_address.clone(),
            stop: CancellationToken::new(),
            started: AtomicBool::new(false),
            local_addr: Arc::new(OnceLock::new()),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, metrics_handle: Option<PrometheusHandle>) -> Router {
        // Only the application route is traced; probes stay out of the exporter.
        let mut router = Router::new()
            .route(HELLO_PATH, get(handlers::hello))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .route(HEALTH_PATH, get(handlers::health));

        if let Some(handle) = metrics_handle {
            router = router.route(
                METRICS_PATH,
                get(move || std::future::ready(handle.render())),
            );
        }

        router
            .route_layer(middleware::from_fn(metrics::track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The routes this server registers.
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// Address actually bound, once serving.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

impl Listener for HttpServer {
    fn start(&self) -> impl std::future::Future<Output = Result<(), ListenerError>> + Send + 'static {
        let first_start = !self.started.swap(true, Ordering::AcqRel);
        let router = self.router.clone();
        let address = self.bind_address.clone();
        let stop = self.stop.clone();
        let local_addr = Arc::clone(&self.local_addr);

        async move {
            if !first_start {
                return Err(ListenerError::AlreadyStarted);
            }

            let listener = TcpListener::bind(&address)
                .await
                .map_err(|source| ListenerError::Bind { address, source })?;
            let bound = listener.local_addr().map_err(ListenerError::Serve)?;
            // Only ever set here, and this branch runs once.
            let _ = local_addr.set(bound);

            tracing::info!(address = %bound, "HTTP server listening");

            axum::serve(listener, router)
                .with_graceful_shutdown(stop.clone().cancelled_owned())
                .await
                .map_err(ListenerError::Serve)?;

            if !stop.is_cancelled() {
                return Err(ListenerError::Exited);
            }

            tracing::info!(address = %bound, "HTTP server stopped");
            Ok(())
        }
    }

    fn request_stop(&self) -> Result<(), ListenerError> {
        if !self.started.load(Ordering::Acquire) {
            return Err(ListenerError::NotRunning);
        }
        if !self.stop.is_cancelled() {
            tracing::info!("Stopping HTTP server, draining connections");
            self.stop.cancel();
        }
        Ok(())
    }
}
