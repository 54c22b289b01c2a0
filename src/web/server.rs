//! Web server for the site page and roster API

use axum::{
    extract::Host,
    handler::HandlerWithoutStateExt,
    http::{
        header::HeaderValue,
        uri::{Authority, PathAndQuery, Scheme},
        Method, StatusCode, Uri,
    },
    response::{IntoResponse, Redirect, Response},
    routing::get,
    BoxError, Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::{
    any::Any,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir};
use tracing::{error, info, warn};

use super::api::list_members;
use super::pages::home_page;
use crate::error::ErrorBody;
use crate::managers::SharedRosterManager;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// TLS certificate locations
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to certificate PEM file (cert + CA bundle)
    pub cert_path: PathBuf,
    /// Path to private key PEM file
    pub key_path: PathBuf,
}

/// Web server configuration
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Main listening port (HTTPS when `tls` is set)
    pub port: u16,
    /// Serve HTTPS when present
    pub tls: Option<TlsConfig>,
    /// Plain HTTP port that redirects to HTTPS (only used with TLS)
    pub http_redirect_port: Option<u16>,
    /// Origin allowed to call the API cross-site
    pub cors_allow_origin: Option<String>,
    /// Directory of static page assets (logos, project images)
    pub public_dir: PathBuf,
}

impl WebServerConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let tls = match (
            std::env::var("TLS_CERT_PATH"),
            std::env::var("TLS_KEY_PATH"),
        ) {
            (Ok(cert), Ok(key)) => Some(TlsConfig {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            _ => None,
        };

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            tls,
            http_redirect_port: std::env::var("HTTP_REDIRECT_PORT")
                .ok()
                .and_then(|s| s.parse().ok()),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|s| !s.is_empty()),
            public_dir: std::env::var("PUBLIC_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR)),
        }
    }
}

/// Shared state for web handlers
#[derive(Clone)]
pub struct AppState {
    pub roster: SharedRosterManager,
}

/// Site and API routes; anything else is looked up in `public_dir`
pub fn routes(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/health", get(health))
        .route("/api/members", get(list_members))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
}

/// Wrap routes with panic recovery and optional CORS
pub fn apply_layers(router: Router, cors_allow_origin: Option<&str>) -> anyhow::Result<Router> {
    let router = match cors_allow_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid CORS_ALLOW_ORIGIN '{}': {}", origin, e))?;
            router.layer(
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods([Method::GET]),
            )
        }
        None => router,
    };

    Ok(router.layer(CatchPanicLayer::custom(handle_panic)))
}

/// Start the web server
pub async fn start_web_server(
    config: WebServerConfig,
    roster: SharedRosterManager,
) -> anyhow::Result<()> {
    if !config.public_dir.is_dir() {
        warn!(
            "Static asset directory {} not found; page images will 404",
            config.public_dir.display()
        );
    }

    let app = apply_layers(
        routes(AppState { roster }, &config.public_dir),
        config.cors_allow_origin.as_deref(),
    )?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let Some(tls) = config.tls else {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Web server listening on http://{}", listener.local_addr()?);
        axum::serve(listener, app).await?;
        return Ok(());
    };

    info!("Loading TLS certificates:");
    info!("  Certificate: {}", tls.cert_path.display());
    info!("  Private key: {}", tls.key_path.display());

    if !tls.cert_path.exists() {
        return Err(anyhow::anyhow!(
            "Certificate file not found: {}",
            tls.cert_path.display()
        ));
    }
    if !tls.key_path.exists() {
        return Err(anyhow::anyhow!(
            "Private key file not found: {}",
            tls.key_path.display()
        ));
    }

    let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| anyhow::anyhow!(
            "Failed to load TLS certificates: {}\n\nHint: The private key must be in PKCS#8 PEM format. If you have an RSA key, convert it with:\n  openssl pkcs8 -topk8 -inform PEM -outform PEM -nocrypt -in private.key -out key.pem",
            e
        ))?;

    if let Some(http_port) = config.http_redirect_port {
        tokio::spawn(redirect_http_to_https(http_port, config.port));
    }

    info!("Web server listening on https://{}", addr);
    axum_server::bind_rustls(addr, tls_config)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

/// Rewrite a request URI onto HTTPS at `https_port`
fn make_https(host: &str, uri: Uri, https_port: u16) -> Result<Uri, BoxError> {
    let mut parts = uri.into_parts();

    parts.scheme = Some(Scheme::HTTPS);

    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }

    let authority: Authority = host.parse()?;
    let bare_host = authority.host();

    // Only add port if it's not the default HTTPS port
    if https_port == 443 {
        parts.authority = Some(bare_host.parse()?);
    } else {
        parts.authority = Some(format!("{bare_host}:{https_port}").parse()?);
    }

    Ok(Uri::from_parts(parts)?)
}

/// Redirect all HTTP requests to HTTPS
async fn redirect_http_to_https(http_port: u16, https_port: u16) {
    let redirect = move |Host(host): Host, uri: Uri| async move {
        match make_https(&host, uri, https_port) {
            Ok(uri) => Ok(Redirect::permanent(&uri.to_string())),
            Err(error) => {
                warn!(%error, "Failed to convert URI to HTTPS");
                Err(StatusCode::BAD_REQUEST)
            }
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind HTTP redirect server on port {}: {}", http_port, e);
            return;
        }
    };

    info!("HTTP redirect server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, redirect.into_make_service()).await {
        error!("HTTP redirect server error: {}", e);
    }
}

/// Health check endpoint
async fn health() -> &'static str {
    "Team Lument site running"
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    error!("Request handler panicked: {}", details);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "Internal Server Error".to_string(),
            details: Some(details),
        }),
    )
        .into_response()
}
