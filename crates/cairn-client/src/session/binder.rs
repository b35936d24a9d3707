//! One-shot exchange of a single-use URL token for a bound support session.
//!
//! # Purpose
//! Inspects the navigation URL for the impersonation token parameter,
//! exchanges it against the bind endpoint at most once per process, and
//! reports the URL the host must install afterwards so the token never
//! survives in history, bookmarks, or referrers.
//!
//! # Key invariants
//! - At most one exchange request per process, guarded by the cell's
//!   attempted flag rather than by mount semantics.
//! - The token is scrubbed from the reported URL on success and failure
//!   alike.
//! - Any failure (explicit rejection, transport error, malformed body)
//!   leaves the session cell inactive and directs the caller to the
//!   application root. A failed bind never falls through to normal mode.
use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::cell::SessionCell;
use cairn_authz::ImpersonationState;
use std::borrow::Cow;
use std::sync::Arc;
use url::Url;

/// Query parameter carrying the single-use impersonation token.
pub const IMPERSONATION_TOKEN_PARAM: &str = "_impersonation_token";

/// Result of the one bind attempt this process gets.
#[derive(Debug)]
pub enum BindOutcome {
    /// No token in the URL; the session stays inactive.
    NoToken,
    /// A bind was already attempted this process; nothing was done.
    AlreadyAttempted,
    /// Session bound. `replace_url` is the input URL without the token and
    /// must be installed via a history replace (no navigation).
    Bound { replace_url: Url },
    /// Exchange failed. The error is blocking and user-visible; the caller
    /// must navigate to `redirect_url` (application root, token-free).
    Failed {
        error: ClientError,
        redirect_url: Url,
    },
}

pub struct SessionBinder {
    api: Arc<ApiClient>,
    cell: Arc<SessionCell>,
}

impl SessionBinder {
    pub fn new(api: Arc<ApiClient>, cell: Arc<SessionCell>) -> Self {
        Self { api, cell }
    }

    /// Run the bind flow against the current navigation URL.
    ///
    /// Callers must await the outcome before rendering impersonation-aware
    /// UI; the capability gate reads whatever state this call leaves behind.
    pub async fn bind(&self, url: &Url) -> BindOutcome {
        if !self.cell.try_begin_bind() {
            return BindOutcome::AlreadyAttempted;
        }

        let Some(token) = extract_token(url) else {
            // No token: the cell keeps its inactive default and the single
            // transition for this page load is spent.
            return BindOutcome::NoToken;
        };

        match self.api.bind_support_session(&token).await {
            Ok(bound) => {
                tracing::info!(
                    organization = %bound.organization_id,
                    mode = %bound.mode,
                    "support session bound"
                );
                self.cell.activate(ImpersonationState::active(
                    bound.organization_id,
                    bound.mode,
                    bound.session_id,
                ));
                BindOutcome::Bound {
                    replace_url: strip_token(url),
                }
            }
            Err(error) => {
                // Rejection, transport failure, and malformed payloads all
                // terminate the flow the same way: inactive state, token
                // scrubbed, user sent home.
                tracing::error!(error = %error, "support session bind failed");
                BindOutcome::Failed {
                    error,
                    redirect_url: root_of(url),
                }
            }
        }
    }
}

fn extract_token(url: &Url) -> Option<String> {
    url.query_pairs().find_map(|(key, value)| {
        if key == IMPERSONATION_TOKEN_PARAM {
            Some(value.into_owned())
        } else {
            None
        }
    })
}

/// The input URL with the token parameter removed and every other query
/// parameter preserved in order.
fn strip_token(url: &Url) -> Url {
    let remaining: Vec<(Cow<'_, str>, Cow<'_, str>)> = url
        .query_pairs()
        .filter(|(key, _)| key != IMPERSONATION_TOKEN_PARAM)
        .collect();

    let mut cleaned = url.clone();
    cleaned.set_query(None);
    if !remaining.is_empty() {
        let mut pairs = cleaned.query_pairs_mut();
        for (key, value) in &remaining {
            pairs.append_pair(key, value);
        }
    }
    cleaned
}

/// Application root for the failure redirect: same origin, no path, no
/// query, no fragment.
fn root_of(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_token_finds_parameter() {
        let url = Url::parse("https://app.cairn.example/dash?tab=1&_impersonation_token=tok-9")
            .expect("url");
        assert_eq!(extract_token(&url).as_deref(), Some("tok-9"));
    }

    #[test]
    fn extract_token_absent() {
        let url = Url::parse("https://app.cairn.example/dash?tab=1").expect("url");
        assert_eq!(extract_token(&url), None);
    }

    #[test]
    fn strip_token_preserves_other_parameters() {
        let url = Url::parse(
            "https://app.cairn.example/dash?tab=1&_impersonation_token=tok-9&view=gantt",
        )
        .expect("url");
        let cleaned = strip_token(&url);
        assert_eq!(
            cleaned.as_str(),
            "https://app.cairn.example/dash?tab=1&view=gantt"
        );
    }

    #[test]
    fn strip_token_drops_query_when_token_was_alone() {
        let url =
            Url::parse("https://app.cairn.example/dash?_impersonation_token=tok-9").expect("url");
        let cleaned = strip_token(&url);
        assert_eq!(cleaned.as_str(), "https://app.cairn.example/dash");
        assert_eq!(cleaned.query(), None);
    }

    #[test]
    fn root_strips_path_query_and_fragment() {
        let url = Url::parse(
            "https://app.cairn.example/projects/7?_impersonation_token=tok-9#section-2",
        )
        .expect("url");
        let root = root_of(&url);
        assert_eq!(root.as_str(), "https://app.cairn.example/");
    }
}
