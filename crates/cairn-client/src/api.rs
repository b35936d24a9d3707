//! Typed HTTP client for the Cairn REST API surface this SDK consumes.
//!
//! # Purpose
//! Wraps a shared `reqwest::Client` and exposes one method per endpoint with
//! typed request and response shapes. Endpoint semantics (caching, retries,
//! fail-closed behavior) live in the callers; this layer only speaks HTTP.
//!
//! # Endpoints
//! - `POST /api/support/impersonation/bind`
//! - `GET  /api/organization/features`
//! - `GET  /api/users/me/permissions`
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use cairn_authz::{FeatureSet, PermissionSet, SupportMode};
use serde::{Deserialize, Serialize};

const BIND_ENDPOINT: &str = "support/impersonation/bind";
const FEATURES_ENDPOINT: &str = "organization/features";
const PERMISSIONS_ENDPOINT: &str = "users/me/permissions";

#[derive(Debug, Serialize)]
struct BindRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct BindResponse {
    impersonation: BoundSession,
}

/// A successfully bound support session as returned by the bind endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundSession {
    pub organization_id: String,
    pub mode: SupportMode,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    #[allow(dead_code)]
    details: Option<String>,
}

/// The authenticated user delivered alongside the permission set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role_id: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PermissionsResponse {
    pub user: CurrentUser,
    pub permissions: PermissionSet,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Exchange a single-use impersonation token for a bound session.
    ///
    /// # Errors
    /// - [`ClientError::BindRejected`] when the server answers non-2xx; the
    ///   server's `error` message is carried through for display.
    /// - [`ClientError::Transport`] when the request never completes.
    /// - [`ClientError::MalformedResponse`] when a 2xx body does not match
    ///   the documented shape. Treated as a bind failure by callers.
    pub async fn bind_support_session(&self, token: &str) -> ClientResult<BoundSession> {
        let url = format!("{}/api/{BIND_ENDPOINT}", self.base_url);
        let response = self
            .http
            .post(url)
            .json(&BindRequest { token })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "token exchange rejected".to_string());
            return Err(ClientError::BindRejected {
                status: status.as_u16(),
                message,
            });
        }

        // Parse strictly from the raw body so a schema mismatch is reported
        // as a malformed response instead of surfacing as a transport error.
        let body = response.text().await?;
        let parsed: BindResponse =
            serde_json::from_str(&body).map_err(|err| ClientError::MalformedResponse {
                endpoint: BIND_ENDPOINT,
                reason: err.to_string(),
            })?;
        Ok(parsed.impersonation)
    }

    /// Fetch the organization's feature toggles.
    pub async fn fetch_features(&self) -> ClientResult<FeatureSet> {
        let url = format!("{}/api/{FEATURES_ENDPOINT}", self.base_url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: FEATURES_ENDPOINT,
                status: status.as_u16(),
            });
        }
        response
            .json::<FeatureSet>()
            .await
            .map_err(|err| decode_error(FEATURES_ENDPOINT, err))
    }

    /// Fetch the current user and their permission set.
    pub(crate) async fn fetch_permissions(&self) -> ClientResult<PermissionsResponse> {
        let url = format!("{}/api/{PERMISSIONS_ENDPOINT}", self.base_url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: PERMISSIONS_ENDPOINT,
                status: status.as_u16(),
            });
        }
        response
            .json::<PermissionsResponse>()
            .await
            .map_err(|err| decode_error(PERMISSIONS_ENDPOINT, err))
    }
}

fn decode_error(endpoint: &'static str, err: reqwest::Error) -> ClientError {
    if err.is_decode() {
        ClientError::MalformedResponse {
            endpoint,
            reason: err.to_string(),
        }
    } else {
        ClientError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_session_parses_wire_shape() {
        let payload = r#"{
            "impersonation": {
                "organizationId": "org-42",
                "mode": "read",
                "sessionId": "sess-7"
            }
        }"#;
        let parsed: BindResponse = serde_json::from_str(payload).expect("parse");
        assert_eq!(parsed.impersonation.organization_id, "org-42");
        assert_eq!(parsed.impersonation.mode, SupportMode::Read);
        assert_eq!(parsed.impersonation.session_id, "sess-7");
    }

    #[test]
    fn bind_response_rejects_unknown_mode() {
        let payload = r#"{
            "impersonation": {
                "organizationId": "org-42",
                "mode": "admin",
                "sessionId": "sess-7"
            }
        }"#;
        assert!(serde_json::from_str::<BindResponse>(payload).is_err());
    }

    #[test]
    fn bind_response_rejects_missing_fields() {
        let payload = r#"{"impersonation": {"organizationId": "org-42"}}"#;
        assert!(serde_json::from_str::<BindResponse>(payload).is_err());
    }

    #[test]
    fn error_body_tolerates_missing_details() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "invalid token"}"#).expect("parse");
        assert_eq!(body.error, "invalid token");
    }

    #[test]
    fn permissions_response_parses_user_and_set() {
        let payload = r#"{
            "user": {
                "id": "u-1",
                "username": "casey",
                "name": "Casey Park",
                "roleId": "role-admin",
                "isActive": true
            },
            "permissions": {"canSeeUsers": true}
        }"#;
        let parsed: PermissionsResponse = serde_json::from_str(payload).expect("parse");
        assert_eq!(parsed.user.username, "casey");
        assert!(parsed.user.is_active);
        assert!(parsed
            .permissions
            .granted(cairn_authz::PermissionKey::CanSeeUsers));
    }
}
