//! Bearer-token authentication for Orgdesk
//!
//! Every mutating route requires an authenticated caller. Tokens are HS256
//! JWTs minted by the member portal; this module verifies them and exposes
//! axum extractors generic over any state `S` where `AuthVerifier: FromRef<S>`
//! (axum's idiomatic nested-state pattern).

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// JWT claims carried by portal-issued tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (member ID)
    pub sub: String,
    /// Role (member or reviewer)
    pub role: String,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
}

/// Role of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Member,
    Reviewer,
}

impl ActorRole {
    /// Parse a role claim. Unknown role strings fall back to Member.
    pub fn from_claim(role: &str) -> Self {
        if role.eq_ignore_ascii_case("reviewer") {
            ActorRole::Reviewer
        } else {
            ActorRole::Member
        }
    }
}

/// Authenticated caller identity
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: ActorRole,
}

impl Actor {
    pub fn is_reviewer(&self) -> bool {
        self.role == ActorRole::Reviewer
    }
}

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    InvalidToken,
    InvalidUserId,
    /// Caller is authenticated but lacks the reviewer role
    NotReviewer,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "Authorization header required",
            ),
            AuthError::InvalidAuthorizationFormat => (
                StatusCode::UNAUTHORIZED,
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token",
            ),
            AuthError::InvalidUserId => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid user ID in token",
            ),
            AuthError::NotReviewer => (
                StatusCode::FORBIDDEN,
                "NOT_REVIEWER",
                "Only reviewers can decide approval requests",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Verifies bearer tokens against the shared HS256 secret
#[derive(Clone)]
pub struct AuthVerifier {
    jwt_secret: String,
}

impl std::fmt::Debug for AuthVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthVerifier").finish_non_exhaustive()
    }
}

impl AuthVerifier {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    /// Validate a bearer token and resolve the calling actor
    pub fn verify(&self, token: &str) -> Result<Actor, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            AuthError::InvalidToken
        })?;

        let id = token_data
            .claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthError::InvalidUserId)?;

        Ok(Actor {
            id,
            role: ActorRole::from_claim(&token_data.claims.role),
        })
    }
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    if let Some(token) = header_str.strip_prefix("Bearer ") {
        Ok(token.to_string())
    } else {
        Err(AuthError::InvalidAuthorizationFormat)
    }
}

/// Authenticated caller extractor
#[derive(Debug)]
pub struct AuthUser(pub Actor);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let verifier = AuthVerifier::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let actor = verifier.verify(&token)?;

        Ok(AuthUser(actor))
    }
}

/// Reviewer-only extractor.
///
/// Like `AuthUser` but rejects non-reviewer callers with 403 FORBIDDEN.
/// Use this for decision endpoints.
#[derive(Debug)]
pub struct ReviewerUser(pub Actor);

impl<S> FromRequestParts<S> for ReviewerUser
where
    AuthVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(actor) = AuthUser::from_request_parts(parts, state).await?;

        if !actor.is_reviewer() {
            return Err(AuthError::NotReviewer);
        }

        Ok(ReviewerUser(actor))
    }
}
