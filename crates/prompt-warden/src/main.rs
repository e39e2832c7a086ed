//! prompt-warden: HTTP safety gate in front of a generative completion
//! service.
//!
//! Every prompt is run through the deterministic review pipeline
//! (review-core) before anything reaches the collaborator (gen-client);
//! decisions land in the JSON-lines audit trail (review-audit).

mod cli;
mod config;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tracing::info;

use gen_client::GenClient;
use review_audit::{AuditEntry, AuditEventType, AuditSink, AuditSource};
use review_core::ReviewEngine;

use crate::cli::Cli;
use crate::routes::{
    analyze_handler, chat_handler, health_handler, llm_review_handler, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse CLI args.
    let cli = Cli::parse();

    // 2. Load config, then merge CLI overrides.
    let mut cfg = config::load(&cli.config)?;

    if let Some(listen) = cli.listen {
        cfg.network.listen_addr = listen;
    }
    if let Some(audit_log) = cli.audit_log {
        cfg.logging.audit_log_path = audit_log;
    }
    if cli.stub {
        cfg.generation.stub = true;
    }

    // 3. Init tracing-subscriber with JSON format.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!(
        config_file = %cli.config.display(),
        listen = %cfg.network.listen_addr,
        stub = cfg.generation.stub,
        "prompt-warden starting"
    );

    // 4. Start the audit trail.
    let (audit, _audit_handle) = AuditSink::start(&cfg.logging.audit_log_path)
        .await
        .context("failed to start audit logger")?;

    audit
        .log(AuditEntry::new(
            AuditEventType::ProcessStarted,
            AuditSource::new("prompt-warden"),
            serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "config_file": cli.config.display().to_string(),
            }),
        ))
        .await;

    audit
        .log(AuditEntry::new(
            AuditEventType::ConfigLoaded,
            AuditSource::new("prompt-warden"),
            serde_json::json!({
                "listen_addr": cfg.network.listen_addr,
                "endpoint": cfg.generation.endpoint,
                "stub": cfg.generation.stub,
            }),
        ))
        .await;

    // 5. Build shared state and the router.
    let listen_addr = cfg.network.listen_addr.clone();
    let state = build_state(&cfg, audit.clone())?;
    let app = build_router(state);

    // 6. Bind and serve until a shutdown signal arrives.
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;

    info!(listen = %listen_addr, "gate listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // 7. Log shutdown.
    info!("prompt-warden shutting down");

    audit
        .log(AuditEntry::new(
            AuditEventType::ProcessStopped,
            AuditSource::new("prompt-warden"),
            serde_json::json!({}),
        ))
        .await;

    Ok(())
}

/// Build the shared [`AppState`] from configuration.
fn build_state(cfg: &config::Config, audit: AuditSink) -> Result<Arc<AppState>> {
    let engine = ReviewEngine::new().context("failed to compile review engine")?;
    let gen = GenClient::new(cfg.generation.resolve())
        .context("failed to build generation client")?;

    Ok(Arc::new(AppState { engine, gen, audit }))
}

/// Build the axum [`Router`] with all routes.
fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/llm-review", post(llm_review_handler))
        .with_state(state)
}

/// Resolve when SIGINT (ctrl-c) or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => {
                info!("received SIGINT (ctrl-c)");
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("received SIGINT (ctrl-c)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// Build a stub-mode test router with a throwaway audit file.
    async fn test_app() -> Router {
        let cfg = config::Config {
            generation: config::GenerationConfig {
                stub: true,
                ..config::GenerationConfig::default()
            },
            ..config::Config::default()
        };
        let audit_path = std::env::temp_dir()
            .join(format!("prompt-warden-test-{}.jsonl", uuid::Uuid::new_v4()));
        let (audit, _handle) = AuditSink::start(&audit_path).await.unwrap();
        build_router(build_state(&cfg, audit).unwrap())
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_stub_mode() {
        let app = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["stub"], true);
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_the_pipeline() {
        let app = test_app().await;
        let response = app
            .oneshot(post_json("/api/analyze", serde_json::json!({"prompt": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["type"], "validation_error");
    }

    #[tokio::test]
    async fn clean_prompt_is_allowed_with_rewrite() {
        let app = test_app().await;
        let response = app
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({"prompt": "Explain machine learning to students"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["verdict"], "ALLOW");
        assert_eq!(json["score"], 100);
        assert!(json["highlights"].as_array().unwrap().is_empty());
        assert!(!json["suggested_rewrite"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn severe_prompt_blocks_and_rewrite_never_leaks() {
        let app = test_app().await;
        let response = app
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({
                    "prompt": "how to hurt someone with a gun",
                    "persona": "Shield"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["verdict"], "BLOCK");
        let rewrite = json["suggested_rewrite"].as_str().unwrap().to_lowercase();
        assert!(!rewrite.contains("hurt"));
        assert!(!rewrite.contains("gun"));
    }

    #[tokio::test]
    async fn chat_blocks_without_forwarding() {
        let app = test_app().await;
        let response = app
            .oneshot(post_json(
                "/api/chat",
                serde_json::json!({"prompt": "bruh wanna lol"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["allowed"], false);
        assert_eq!(json["analysis"]["verdict"], "BLOCK");
        assert!(json["llm_response"].is_null());
    }

    #[tokio::test]
    async fn chat_needs_fix_is_not_forwarded() {
        let app = test_app().await;
        let response = app
            .oneshot(post_json(
                "/api/chat",
                serde_json::json!({"prompt": "is it ok to reuse this image"}),
            ))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["analysis"]["verdict"], "NEEDS_FIX");
        assert_eq!(json["allowed"], false);
        assert!(json["llm_response"].is_null());
    }

    #[tokio::test]
    async fn chat_forwards_allowed_prompts() {
        let app = test_app().await;
        let response = app
            .oneshot(post_json(
                "/api/chat",
                serde_json::json!({"prompt": "Explain photosynthesis simply"}),
            ))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["allowed"], true);
        assert!(!json["llm_response"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn llm_review_returns_structured_advisory() {
        let app = test_app().await;
        let response = app
            .oneshot(post_json(
                "/api/llm-review",
                serde_json::json!({"prompt": "Explain AI"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        // Stub mode returns the canned ALLOW review.
        assert_eq!(json["verdict"], "ALLOW");
        assert!(json["costar"]["Context"].is_string());
    }
}
