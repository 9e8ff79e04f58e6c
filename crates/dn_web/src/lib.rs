use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod handlers;
pub mod state;
pub mod templates;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/page/:page", get(handlers::go_to_page))
        .route("/articles/summarize", post(handlers::summarize_article))
        .route("/articles/summary", get(handlers::show_summary))
        .route("/overlay/dismiss", get(handlers::dismiss_overlay))
        .route("/check", post(handlers::check_new_articles))
        .route("/summarize", post(handlers::generate_all_summaries))
        .route("/stats", get(handlers::stats))
        .route("/static/style.css", get(handlers::stylesheet))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("🌐 Serving at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use dn_core::{Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{self, Body},
        http::{header, Request, StatusCode},
    };
    use dn_backend::MemoryBackend;
    use dn_core::Article;
    use dn_view::{ViewConfig, ViewController};
    use tower::ServiceExt;

    async fn setup() -> (Router, ViewController) {
        let articles = (1..=25)
            .map(|i| Article {
                url: format!("https://a/{}", i),
                title: if i == 1 {
                    "<script>alert(1)</script>".to_string()
                } else {
                    format!("Article {}", i)
                },
                created_at: "2025-03-01 09:30:00".to_string(),
            })
            .collect();
        let backend = MemoryBackend::with_articles(articles).await;
        let controller = ViewController::new(Arc::new(backend), ViewConfig::default());
        controller.initialize().await.unwrap();
        (create_app(AppState::new(controller.clone())), controller)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_index_escapes_titles() {
        let (app, _) = setup().await;
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn test_navigation_redirects_to_top() {
        let (app, controller) = setup().await;
        let response = app
            .clone()
            .oneshot(Request::get("/page/2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/#top");
        assert_eq!(controller.snapshot().await.pagination().current, 2);

        app.oneshot(Request::get("/page/9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(controller.snapshot().await.pagination().current, 2);
    }

    #[tokio::test]
    async fn test_summarize_view_and_dismiss() {
        let (app, controller) = setup().await;
        let response = app
            .clone()
            .oneshot(
                Request::post("/articles/summarize")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("url=https%3A%2F%2Fa%2F2"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(controller.snapshot().await.index().contains("https://a/2"));

        app.clone()
            .oneshot(
                Request::get("/articles/summary?url=https%3A%2F%2Fa%2F2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(
            app.clone()
                .oneshot(Request::get("/").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("overlay-content"));
        assert!(html.contains("📖 View summary"));

        app.oneshot(
            Request::get("/overlay/dismiss?target=background")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
        assert!(controller.snapshot().await.overlay().is_none());
    }

    #[tokio::test]
    async fn test_unknown_dismiss_target_is_rejected() {
        let (app, _) = setup().await;
        let response = app
            .oneshot(
                Request::get("/overlay/dismiss?target=content")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_document_and_health() {
        let (app, _) = setup().await;
        let html = body_text(
            app.clone()
                .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains(r#"<strong id="total-count">25</strong>"#));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="30">"#));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let payload: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(payload["status"], "healthy");
    }
}
