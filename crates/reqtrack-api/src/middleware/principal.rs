//! Principal extraction middleware.
//!
//! Authentication is an external collaborator: this service only needs a
//! stable principal id for its records. A `Bearer <uuid>` credential
//! resolves to an authenticated principal; anything else is anonymous.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use reqtrack_track::Principal;

/// Resolves the request principal and inserts it into request extensions
/// for the tracking middleware and handlers downstream.
pub async fn extract_principal(mut request: Request, next: Next) -> Response {
    let principal = principal_from_header(
        request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok()),
    );
    request.extensions_mut().insert(principal);
    next.run(request).await
}

/// Parse an Authorization header value into a principal.
fn principal_from_header(header: Option<&str>) -> Principal {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| token.trim().parse().ok())
        .map(Principal::User)
        .unwrap_or(Principal::Anonymous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_uuid_resolves_to_user() {
        let id = uuid::Uuid::new_v4();
        let principal = principal_from_header(Some(&format!("Bearer {id}")));
        assert_eq!(principal, Principal::User(id));
    }

    #[test]
    fn missing_or_malformed_credentials_are_anonymous() {
        assert_eq!(principal_from_header(None), Principal::Anonymous);
        assert_eq!(
            principal_from_header(Some("Bearer not-a-uuid")),
            Principal::Anonymous
        );
        assert_eq!(
            principal_from_header(Some("Basic dXNlcjpwYXNz")),
            Principal::Anonymous
        );
    }
}
