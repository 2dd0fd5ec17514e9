//! HTTP front-end of the catalog.
//!
//! | Route | Outcome |
//! | ----- | ------- |
//! | `POST /adrequest` | `200` with an [`AdResponse`](crate::serve::AdResponse), `204` when no creative fits, `404` for an unknown placement or an empty catalog, `400` for a body that is not a JSON ad request |
//! | `GET/POST /refresh` | `200` once the catalog is reloaded, `503` if the store is unavailable |
//!
//! The request body is decoded as JSON whatever its `Content-Type`. Unless started with `--no-seed`, the server inserts
//! the [sample catalog](crate::sample) on startup; entities already in the database are left as they are.
use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use clap::error::ErrorKind;
use clap::CommandFactory;
use clap::Parser;
use garde::Validate;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;
use tracing::error;
use tracing::info;

#[cfg(feature = "pg")]
use crate::driver::pg::Pg;
#[cfg(feature = "sqlite")]
use crate::driver::sqlite::Sqlite;
use crate::cache::refresh_interval;
use crate::prelude::*;
use crate::sample;
use crate::serve::serve_ad;
use crate::serve::AdRequest;
use crate::serve::ServeOutcome;
use crate::store::DbStore;

mod cli;

use cli::Cli;

/// The `adserver` application: configuration, logging and the HTTP server lifecycle.
#[derive(Debug)]
pub struct AdServerApp {
    cli: Cli,
}

impl AdServerApp {
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self {
            cli: Cli::try_parse_from(args)?,
        })
    }

    /// Parse the command line and serve until interrupted.
    pub async fn run() -> anyhow::Result<()> {
        let app = Self { cli: Cli::parse() };
        app.execute().await
    }

    fn validate(&self) {
        if let Err(err) = self.cli.validate() {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err).exit();
        }
    }

    fn setup_tracing(&self) -> anyhow::Result<()> {
        use std::sync::Mutex;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        if let Some(log_file) = self.cli.log_file() {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
                .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
        else {
            registry.with(tracing_subscriber::fmt::layer()).try_init()?;
        }

        info!("Tracing initialized");
        Ok(())
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        self.validate();
        self.setup_tracing()?;

        info!("Starting adserver v{}", env!("CARGO_PKG_VERSION"));

        let cli = &self.cli;

        #[cfg(feature = "pg")]
        if cli.pg() {
            let driver = Pg::builder()
                .host(cli.pg_host())
                .port(cli.pg_port())
                .user(cli.pg_user())
                .password(cli.pg_password())
                .database(cli.pg_database())
                .build()
                .map_err(|err| anyhow!("Failed to set up the PostgreSQL driver: {err:?}"))?;
            driver.connect().await.context("Failed to connect to PostgreSQL")?;
            return self.serve_with(driver).await;
        }

        #[cfg(feature = "sqlite")]
        if !cli.pg() {
            let sqlite_path = cli.sqlite_path();
            let driver = Sqlite::connect(&sqlite_path)
                .await
                .with_context(|| format!("Failed to open SQLite database {}", sqlite_path.display()))?;
            return self.serve_with(Arc::new(driver)).await;
        }

        Err(anyhow!(
            "No database backend is enabled. Build with the 'sqlite' or 'pg' feature."
        ))
    }

    async fn serve_with<D>(&self, driver: Arc<D>) -> anyhow::Result<()>
    where
        D: DatabaseDriver,
    {
        let cli = &self.cli;

        driver.configure().await.context("Failed to configure the database")?;
        info!("Using {} database", driver.name());

        let store = Arc::new(DbStore::new(driver));
        let cache = CatalogCache::initialize(Arc::clone(&store))
            .await
            .context("Failed to load the ad catalog")?;

        if cli.seed() {
            sample::seed(&cache).await.context("Failed to seed the sample catalog")?;
        }

        let refresher = cache.spawn_refresher(refresh_interval(Duration::from_secs(cli.refresh_interval())));

        let listener = TcpListener::bind(cli.bind())
            .await
            .with_context(|| format!("Failed to bind to {}", cli.bind()))?;
        info!("Serving ads on http://{}", listener.local_addr()?);

        axum::serve(listener, router(Arc::clone(&cache)))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        refresher.abort();
        let _ = refresher.await;
        store.close().await.context("Failed to close the database")?;

        info!("Server stopped");
        Ok(())
    }
}

pub fn router<S>(cache: Arc<CatalogCache<S>>) -> Router
where
    S: CatalogStore,
{
    Router::new()
        .route("/adrequest", post(ad_request::<S>))
        .route("/refresh", get(refresh::<S>).post(refresh::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(cache)
}

async fn ad_request<S>(State(cache): State<Arc<CatalogCache<S>>>, body: Bytes) -> Response
where
    S: CatalogStore,
{
    // Any content type is accepted as long as the body is a JSON ad request.
    let request: AdRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            debug!("Malformed ad request: {err}");
            return (StatusCode::BAD_REQUEST, format!("malformed ad request: {err}")).into_response();
        }
    };

    match serve_ad(&cache, request) {
        Ok(ServeOutcome::Served(response)) => Json(response).into_response(),
        Ok(ServeOutcome::NoApplicableCreative) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn refresh<S>(State(cache): State<Arc<CatalogCache<S>>>) -> Result<&'static str, CatalogError>
where
    S: CatalogStore,
{
    cache.refresh().await?;
    Ok("Cache refreshed successfully")
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::DuplicateKey { .. } => StatusCode::CONFLICT,
            CatalogError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };

        if status.is_server_error() {
            error!("{self}");
        }
        else {
            debug!("{self}");
        }

        (status, self.to_string()).into_response()
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C, running until killed: {err}");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use super::*;
    use crate::test::FlakyStore;
    use crate::test::TempStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn test_cli_parsing() {
        let args = vec!["adserver", "--bind", "127.0.0.1:9000", "--refresh-interval", "30", "--no-seed"];
        let cli = Cli::try_parse_from(args).expect("Failed to parse CLI arguments");
        assert_eq!(cli.bind(), "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.refresh_interval(), 30);
        assert!(!cli.seed());
        assert!(!cli.pg());
        assert_eq!(cli.sqlite_path(), PathBuf::from("ad.db"));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn app_from_args() {
        let app = AdServerApp::from_args(["adserver", "--sqlite-path", "/tmp/catalog.db"]).unwrap();
        assert_eq!(app.cli.sqlite_path(), PathBuf::from("/tmp/catalog.db"));
        assert_eq!(app.cli.refresh_interval(), 300);
        assert!(app.cli.seed(), "the sample catalog is seeded unless asked not to");

        assert!(AdServerApp::from_args(["adserver", "--refresh-interval", "soon"]).is_err());
    }

    #[test]
    fn zero_refresh_interval_is_rejected() {
        let cli = Cli::try_parse_from(vec!["adserver", "--refresh-interval", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }

    async fn seeded() -> (TempStore, Arc<CatalogCache<FlakyStore<DbStore<Sqlite>>>>) {
        let temp = TempStore::new().await.unwrap();
        let store = Arc::new(FlakyStore::new(Arc::clone(&temp.store)));
        let cache = CatalogCache::initialize(store).await.unwrap();
        sample::seed(&cache).await.unwrap();
        (temp, cache)
    }

    fn ad_request_for(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/adrequest")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn serves_best_creative() {
        let (_temp, cache) = seeded().await;

        let response = router(cache)
            .oneshot(ad_request_for(r#"{"ad_unit_id": "adunit1", "user_id": "user-42"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: crate::serve::AdResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.creative_id, "creative1");
        assert_eq!(body.content, "Sample Banner Ad");
        assert_eq!(body.price, 1.5);
        assert_eq!(body.user_id, "user-42");
    }

    #[tokio::test]
    async fn request_outcomes_map_to_statuses() {
        let (_temp, cache) = seeded().await;
        let app = router(cache);

        // Nothing fits the video placement.
        let response = app
            .clone()
            .oneshot(ad_request_for(r#"{"ad_unit_id": "adunit3"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(ad_request_for(r#"{"ad_unit_id": "nope"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "placement 'nope' not found");

        let response = app.oneshot(ad_request_for("{")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ad_request_body_is_json_whatever_the_content_type() {
        let (_temp, cache) = seeded().await;
        let app = router(cache);

        for content_type in [None, Some("text/plain")] {
            let mut builder = Request::builder().method("POST").uri("/adrequest");
            if let Some(content_type) = content_type {
                builder = builder.header("content-type", content_type);
            }
            let response = app
                .clone()
                .oneshot(builder.body(Body::from(r#"{"ad_unit_id": "adunit2"}"#)).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "content type {content_type:?}");
            let body: crate::serve::AdResponse = serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(body.creative_id, "creative2");
            assert!(!body.user_id.is_empty());
        }

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/adrequest")
                    .body(Body::from("adunit2"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.starts_with("malformed ad request: "));
    }

    #[tokio::test]
    async fn refresh_endpoint() {
        let (temp, cache) = seeded().await;
        let app = router(Arc::clone(&cache));

        // Written behind the cache's back; only a refresh makes it visible.
        temp.store
            .insert_placement(&AdPlacement::new("adunit4", AdFormat::Banner, 728, 90))
            .await
            .unwrap();
        assert!(cache.get_placement_by_id("adunit4").is_err());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/refresh").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Cache refreshed successfully");
        assert_eq!(cache.get_placement_by_id("adunit4").unwrap().width, 728);

        cache.store().set_down(true);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(cache.placement_count(), 4);
    }
}
