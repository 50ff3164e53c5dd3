use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::types::Uuid;

use crate::db::models::UserRole;
use crate::scheduling::AuthContext;

/// Resolves the caller's identity from the gateway-injected headers and
/// stores it in the request extensions. Authentication itself (tokens,
/// sessions) happens upstream; this service only trusts the gateway's
/// `X-User-Id` and `X-User-Role` headers.
pub async fn auth_context_middleware(mut request: Request, next: Next) -> Response {
    match auth_context_from_headers(request.headers()) {
        Some(ctx) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {
                    "message": "Authentication required",
                }
            })),
        )
            .into_response(),
    }
}

fn auth_context_from_headers(headers: &HeaderMap) -> Option<AuthContext> {
    let user_id = headers
        .get("X-User-Id")?
        .to_str()
        .ok()?
        .parse::<Uuid>()
        .ok()?;
    let role = headers
        .get("X-User-Role")?
        .to_str()
        .ok()?
        .parse::<UserRole>()
        .ok()?;

    Some(AuthContext { user_id, role })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(id: &str, role: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_str(id).unwrap());
        headers.insert("x-user-role", HeaderValue::from_str(role).unwrap());
        headers
    }

    #[test]
    fn resolves_well_formed_headers() {
        let id = Uuid::now_v7();
        let ctx = auth_context_from_headers(&headers(&id.to_string(), "professor")).unwrap();
        assert_eq!(ctx.user_id, id);
        assert_eq!(ctx.role, UserRole::Professor);
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert!(auth_context_from_headers(&HeaderMap::new()).is_none());
        assert!(auth_context_from_headers(&headers("not-a-uuid", "professor")).is_none());
        let id = Uuid::now_v7().to_string();
        assert!(auth_context_from_headers(&headers(&id, "janitor")).is_none());
    }
}
