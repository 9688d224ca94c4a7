use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use configuration::ServerSettings;
use database::QuoteRepository;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub repo: QuoteRepository,
}

/// Builds the router: the quote API, the chat webhook, and a static-file
/// fallback for every other path.
pub fn build_router(repo: QuoteRepository, static_dir: &Path, detailed_errors: bool) -> Router {
    let app_state = Arc::new(AppState { repo });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let mut app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/quotes", get(handlers::list_quotes).post(handlers::create_quote))
        .route(
            "/quotes/:id",
            get(handlers::get_quote)
                .post(handlers::update_quote)
                .delete(handlers::delete_quote),
        )
        .route("/slack/quote", post(handlers::slack_quote))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(app_state);

    if detailed_errors {
        app = app.layer(middleware::map_response(error::detailed_error_mapping));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // Quotes are short; 1MB is plenty.
}

/// The main function to configure and run the web server.
pub async fn run_server(settings: &ServerSettings, repo: QuoteRepository) -> anyhow::Result<()> {
    let app = build_router(repo, &settings.static_dir, settings.detailed_errors);

    let listener = tokio::net::TcpListener::bind(settings.bind_address()?).await?;
    let addr = listener.local_addr()?;
    tracing::info!(
        static_dir = %settings.static_dir.display(),
        detailed_errors = settings.detailed_errors,
        "Web server listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C.");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down."),
        _ = terminate => tracing::warn!("Received SIGTERM, shutting down."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use database::MemoryQuoteStore;
    use tower::ServiceExt;

    fn app_with(detailed_errors: bool, static_dir: &Path) -> Router {
        let repo = QuoteRepository::new(Arc::new(MemoryQuoteStore::new()));
        build_router(repo, static_dir, detailed_errors)
    }

    fn app() -> Router {
        app_with(false, Path::new("does-not-exist"))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = send(&app(), "GET", "/api/health", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn test_quote_lifecycle() {
        let app = app();

        let response = send(&app, "POST", "/quotes", r#"{"quote":"Hello","person":"Ada"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "1");

        let response = send(&app, "GET", "/quotes/1", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Hello");

        let response = send(&app, "POST", "/quotes/1", r#"{"person":"Grace"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "");

        let response = send(&app, "GET", "/quotes/1", "").await;
        assert_eq!(body_text(response).await, "Hello");

        let response = send(&app, "GET", "/quotes", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            r#"{"quotes":[{"id":1,"quote":"Hello","person":"Grace"}]}"#
        );

        let response = send(&app, "POST", "/slack/quote", "token=abc&command=%2Fquote").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            r#"{"text":"Hello\n-_Grace_","username":"quotebot","mrkdwn":true}"#
        );

        let response = send(&app, "GET", "/quotes/random", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Hello");

        let response = send(&app, "DELETE", "/quotes/1", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "");

        let response = send(&app, "GET", "/quotes", "").await;
        assert_eq!(body_text(response).await, r#"{"quotes":[]}"#);
    }

    #[tokio::test]
    async fn test_update_with_empty_fields_changes_nothing() {
        let app = app();
        send(&app, "POST", "/quotes", r#"{"quote":"Hello","person":"Ada"}"#).await;

        let response = send(&app, "POST", "/quotes/1", r#"{"quote":"","person":""}"#).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "GET", "/quotes", "").await;
        assert_eq!(
            body_text(response).await,
            r#"{"quotes":[{"id":1,"quote":"Hello","person":"Ada"}]}"#
        );
    }

    #[tokio::test]
    async fn test_missing_rows_are_silent_for_writes() {
        let app = app();
        let response = send(&app, "POST", "/quotes/9", r#"{"quote":"x"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(&app, "DELETE", "/quotes/9", "").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_failures_are_flat_500_with_empty_body() {
        let app = app();
        let cases = [
            ("POST", "/quotes", r#"{"quote":"Hello"}"#),
            ("POST", "/quotes", r#"{"quote":"","person":"Ada"}"#),
            ("POST", "/quotes", "not json"),
            ("POST", "/quotes", ""),
            ("POST", "/quotes/1", "{"),
            ("GET", "/quotes/1", ""),
            ("GET", "/quotes/random", ""),
            ("GET", "/quotes/abc", ""),
            ("DELETE", "/quotes/abc", ""),
            ("GET", "/quotes/%FF", ""),
            ("POST", "/quotes/%FF", r#"{"quote":"x"}"#),
            ("DELETE", "/quotes/%FF", ""),
            ("POST", "/slack/quote", ""),
        ];

        for (method, uri, body) in cases {
            let response = send(&app, method, uri, body).await;
            assert_eq!(
                response.status(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "{method} {uri} {body:?}"
            );
            assert_eq!(body_text(response).await, "");
        }

        let oversized = format!(
            r#"{{"quote":"{}","person":"Ada"}}"#,
            "x".repeat(2 * 1024 * 1024)
        );
        for uri in ["/quotes", "/quotes/1"] {
            let response = send(&app, "POST", uri, &oversized).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body_text(response).await, "");
        }

        let response = send(&app, "GET", "/quotes", "").await;
        assert_eq!(body_text(response).await, r#"{"quotes":[]}"#);
    }

    #[tokio::test]
    async fn test_bodies_decode_like_a_stream_reader() {
        let app = app();

        let response =
            send(&app, "POST", "/quotes", r#"{"quote":"Hello","person":"Ada"} extra"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "1");

        let response = send(&app, "POST", "/quotes/1", "null").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "POST", "/quotes", "null").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = send(&app, "GET", "/quotes", "").await;
        assert_eq!(
            body_text(response).await,
            r#"{"quotes":[{"id":1,"quote":"Hello","person":"Ada"}]}"#
        );
    }

    #[tokio::test]
    async fn test_detailed_errors_map_kinds_to_statuses() {
        let app = app_with(true, Path::new("does-not-exist"));

        let response = send(&app, "POST", "/quotes", r#"{"quote":"Hello"}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, r#"{"error":"validation_error"}"#);

        let response = send(&app, "GET", "/quotes/5", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, r#"{"error":"not_found"}"#);

        let response = send(&app, "POST", "/slack/quote", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, r#"{"error":"empty_store"}"#);

        let response = send(&app, "POST", "/quotes", "{").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, r#"{"error":"decode_error"}"#);

        // Successful responses pass through untouched.
        let response = send(&app, "POST", "/quotes", r#"{"quote":"Hi","person":"Ada"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "1");
    }

    #[tokio::test]
    async fn test_unmatched_paths_fall_back_to_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>quotes</h1>").unwrap();
        let app = app_with(false, dir.path());

        let response = send(&app, "GET", "/index.html", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>quotes</h1>");

        let response = send(&app, "GET", "/", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "GET", "/missing.js", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
