use async_trait::async_trait;
use axum::http::HeaderMap;

/// Opaque caller identity. The proxy only ever checks presence/absence;
/// the id itself comes from whatever identity layer fronts the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

/// Identity resolution is injected into the proxy rather than read from
/// ambient request context, so deployments can swap the scheme.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Option<Identity>;
}

/// Shared-token scheme: `Authorization: Bearer <token>` or `x-api-key`.
/// An empty configured token fails closed.
pub struct SharedTokenResolver {
    token: String,
}

impl SharedTokenResolver {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl IdentityResolver for SharedTokenResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Option<Identity> {
        let expected = self.token.trim();
        if expected.is_empty() {
            return None;
        }

        let header = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let api_key = headers
            .get("x-api-key")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let bearer = header.strip_prefix("Bearer ").unwrap_or("").trim();

        if bearer == expected || api_key.trim() == expected {
            Some(Identity {
                user_id: "local".to_string(),
            })
        } else {
            None
        }
    }
}

/// Trusts an `x-user-id` header stamped by a hosted identity provider
/// sitting in front of the daemon.
pub struct SessionHeaderResolver;

#[async_trait]
impl IdentityResolver for SessionHeaderResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Option<Identity> {
        let user_id = headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())?;

        Some(Identity {
            user_id: user_id.to_string(),
        })
    }
}
