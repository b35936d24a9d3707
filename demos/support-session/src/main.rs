//! # Purpose
//! Demonstrate the full support-session flow end to end: token detection in
//! a navigation URL, the one-shot exchange against a real HTTP endpoint,
//! URL scrubbing, capability gating, and fail-closed permission/feature
//! resolution.
//!
//! # High-level flow
//! 1. Start an in-process mock of the Cairn REST API (bind, features,
//!    permissions endpoints) on an ephemeral port.
//! 2. Run the binder against a URL carrying a single-use token and show the
//!    history-replace URL it hands back.
//! 3. Query the capability gate in read mode and show that writes are off.
//! 4. Load permissions and features and print the named predicates.
//! 5. Run a second bind attempt and show it is refused.
//!
//! # Notes
//! The mock accepts any token once; this demo exercises the client, not
//! server-side enforcement.
use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use cairn_authz::{FeatureKey, PermissionKey};
use cairn_client::{
    ApiClient, BindOutcome, CapabilityGate, ClientConfig, FeatureResolver, PermissionResolver,
    SessionBinder, SessionCell,
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (base, _server) = spawn_mock_api().await?;
    tracing::info!(%base, "mock cairn api listening");

    let config = ClientConfig::from_env()?.with_api_base(&base);
    let api = Arc::new(ApiClient::new(&config)?);
    let cell = Arc::new(SessionCell::new());
    let binder = SessionBinder::new(api.clone(), cell.clone());
    let gate = CapabilityGate::new(cell.clone());

    // A support engineer followed a link carrying a single-use token.
    let navigation_url = Url::parse(
        "https://app.cairn.example/projects/7?view=gantt&_impersonation_token=demo-token-1",
    )
    .context("parse navigation url")?;

    match binder.bind(&navigation_url).await {
        BindOutcome::Bound { replace_url } => {
            tracing::info!(%replace_url, "bound; install this via history replace");
        }
        BindOutcome::Failed {
            error,
            redirect_url,
        } => {
            tracing::error!(%error, %redirect_url, "bind failed; redirecting home");
        }
        BindOutcome::NoToken => tracing::info!("no token in url; normal session"),
        BindOutcome::AlreadyAttempted => tracing::warn!("bind already attempted"),
    }

    let state = gate.state();
    tracing::info!(
        impersonating = state.is_impersonating(),
        read_only = state.is_read_only(),
        organization = state.organization_id().unwrap_or("-"),
        can_write = gate.can_write(),
        "capability gate after bind"
    );

    let permissions = PermissionResolver::new(api.clone(), &config);
    permissions.refresh().await?;
    tracing::info!(
        user = %permissions
            .current_user()
            .map(|user| user.username)
            .unwrap_or_default(),
        user_management = permissions.can_access_user_management(),
        manage_projects = permissions.can_manage_projects(),
        delete_projects = permissions.can_delete_projects(),
        see_reports = permissions.can_see_reports(),
        manage_system = permissions.can_manage_system(),
        "permission predicates"
    );

    let features = FeatureResolver::new(api);
    features.load().await?;
    tracing::info!(
        readiness_surveys = features.has_feature(FeatureKey::ReadinessSurveys),
        gpt_coach = features.has_feature(FeatureKey::GptCoach),
        reports = features.has_feature(FeatureKey::Reports),
        "feature flags"
    );

    // Per-key check sourced from the resolver, the way UI code consumes it.
    if permissions.has_permission(PermissionKey::CanSeeReports) && gate.can_access("reports") {
        tracing::info!("reports surface would render");
    }

    // A second mount must not issue another exchange.
    let second = binder.bind(&navigation_url).await;
    tracing::info!(outcome = ?second, "second bind attempt");

    Ok(())
}

async fn spawn_mock_api() -> Result<(String, tokio::task::JoinHandle<()>)> {
    let app = Router::new()
        .route(
            "/api/support/impersonation/bind",
            post(|Json(request): Json<Value>| async move {
                match request["token"].as_str() {
                    Some(token) if !token.is_empty() => (
                        StatusCode::OK,
                        Json(json!({
                            "impersonation": {
                                "organizationId": "org-acme",
                                "mode": "read",
                                "sessionId": "sess-demo-1"
                            }
                        })),
                    ),
                    _ => (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"error": "invalid token"})),
                    ),
                }
            }),
        )
        .route(
            "/api/users/me/permissions",
            get(|| async {
                Json(json!({
                    "user": {
                        "id": "u-support-1",
                        "username": "support.casey",
                        "name": "Casey Park",
                        "roleId": "role-support",
                        "isActive": true
                    },
                    "permissions": {
                        "canSeeUsers": true,
                        "canSeeProjects": true,
                        "canSeeReports": true
                    }
                }))
            }),
        )
        .route(
            "/api/organization/features",
            get(|| async {
                Json(json!({
                    "readinessSurveys": true,
                    "gptCoach": false,
                    "communications": true,
                    "changeArtifacts": false,
                    "reports": true
                }))
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind mock api")?;
    let addr: SocketAddr = listener.local_addr().context("mock api addr")?;
    let server = axum::serve(listener, app.into_make_service());
    let handle = tokio::spawn(async move {
        let _ = server.await;
    });
    Ok((format!("http://{addr}"), handle))
}
