//! matcha-router demo server.
//!
//! Serves a small fixed route set so the router can be exercised over real
//! HTTP:
//!
//! ```text
//! GET /health          → {"status":"ok"}
//! GET /users/{id}      → {"id":"<id>"}
//! GET /files/{path*}   → {"path":"<rest of path>"}
//! ```

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response};
use clap::Parser;
use tokio::net::TcpListener;

use matcha_router::config::{load_config, RouterConfig};
use matcha_router::lifecycle::{signals, Shutdown};
use matcha_router::middleware::{cors, request_id};
use matcha_router::observability::{logging, metrics};
use matcha_router::{HttpServer, RequestContextExt, Route, Router, RouterError};

#[derive(Parser)]
#[command(name = "matcha-router")]
#[command(about = "Demo HTTP server for the matcha router", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!("matcha-router v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = build_router(&config)?;
    tracing::info!(
        routes = router.route_count(),
        max_params = router.max_params(),
        "Router built"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    HttpServer::new(router, config)
        .run(listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(config: &RouterConfig) -> Result<Router, RouterError> {
    let mut router = Router::from_config(&config.routing);
    router.attach(request_id::middleware());
    if config.cors.enabled {
        router.attach(cors::middleware((&config.cors).into()));
    }

    router.add_route(Route::get("/health")?, |res: &mut Response<Body>, _req: Request<Body>| {
        json(res, serde_json::json!({ "status": "ok" }));
    })?;
    router.add_route(Route::get("/users/{id}")?, |res: &mut Response<Body>, req: Request<Body>| {
        json(res, serde_json::json!({ "id": req.param("id") }));
    })?;
    router.add_route(Route::get("/files/{path*}")?, |res: &mut Response<Body>, req: Request<Body>| {
        json(res, serde_json::json!({ "path": req.param("path") }));
    })?;

    Ok(router)
}

fn json(res: &mut Response<Body>, value: serde_json::Value) {
    res.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *res.body_mut() = Body::from(value.to_string());
}
