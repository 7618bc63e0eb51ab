//! Registered route table and its JSON export.

use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

pub const HELLO_PATH: &str = "/";
pub const HEALTH_PATH: &str = "/health";
pub const METRICS_PATH: &str = "/metrics";

/// One registered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Error)]
pub enum RouteExportError {
    #[error("failed to serialize routes: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The routes a server serves, in registration order.
pub fn route_table(metrics_enabled: bool) -> Vec<RouteInfo> {
    let mut routes = vec![
        RouteInfo {
            method: "GET",
            path: HELLO_PATH,
            name: "hello",
        },
        RouteInfo {
            method: "GET",
            path: HEALTH_PATH,
            name: "health",
        },
    ];
    if metrics_enabled {
        routes.push(RouteInfo {
            method: "GET",
            path: METRICS_PATH,
            name: "metrics",
        });
    }
    routes
}

/// Write `routes` to `path` as pretty-printed JSON.
pub fn export_routes(routes: &[RouteInfo], path: &Path) -> Result<(), RouteExportError> {
    let data = serde_json::to_string_pretty(routes)?;
    fs::write(path, data).map_err(|source| RouteExportError::Write {
        path: path.display().to_string(),
        source,
    })
}
