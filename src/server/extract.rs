use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{self, Extension, FromRequest, RequestParts};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::BoxError;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{AuthAPI, DynAPI};
use crate::auth::{Audience, User};
use crate::error::{invalid_input_error, unauthenticated_error, unexpected_error, Error};

/// Dashboard principal, from a token issued by `/api/auth/login`.
pub struct Session(pub User);

/// Public API principal, from a token issued by `/api/public/auth/login`.
pub struct Bearer(pub User);

fn bearer_token(headers: &HeaderMap) -> Result<String, Error> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthenticated_error)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(unauthenticated_error()),
    }
}

async fn authenticate<B: Send>(req: &mut RequestParts<B>, audience: Audience) -> Result<User, Error> {
    let Extension(api) = Extension::<DynAPI>::from_request(req)
        .await
        .map_err(|_| unexpected_error())?;

    let token = bearer_token(req.headers())?;

    api.authenticate(audience, &token).await
}

#[async_trait]
impl<B: Send> FromRequest<B> for Session {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        Ok(Self(authenticate(req, Audience::Admin).await?))
    }
}

#[async_trait]
impl<B: Send> FromRequest<B> for Bearer {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        Ok(Self(authenticate(req, Audience::Public).await?))
    }
}

/// JSON body in and out. Malformed bodies are rejected as invalid input
/// with the usual error body.
pub struct Json<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for Json<T>
where
    T: DeserializeOwned,
    B: HttpBody + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let extract::Json(value) = extract::Json::<T>::from_request(req)
            .await
            .map_err(|rejection| invalid_input_error(rejection.to_string()))?;

        Ok(Self(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        extract::Json(self.0).into_response()
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

pub struct Query<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for Query<T>
where
    T: DeserializeOwned,
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let extract::Query(value) = extract::Query::<T>::from_request(req)
            .await
            .map_err(|rejection| invalid_input_error(rejection.to_string()))?;

        Ok(Self(value))
    }
}

pub struct Path<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for Path<T>
where
    T: DeserializeOwned + Send,
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let extract::Path(value) = extract::Path::<T>::from_request(req)
            .await
            .map_err(|rejection| invalid_input_error(rejection.to_string()))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};
    use serde::Deserialize;
    use tokio_test::block_on;

    #[derive(Debug, Deserialize)]
    struct DeleteParams {
        force: bool,
    }

    fn parts(request: Request<Body>) -> RequestParts<Body> {
        RequestParts::new(request)
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reads_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        assert!(bearer_token(&HeaderMap::new())
            .unwrap_err()
            .is_unauthenticated_error());
        assert!(bearer_token(&headers("Basic dXNlcjpwdw==")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
    }

    #[test]
    fn malformed_query_is_invalid_input() {
        let request = Request::builder()
            .uri("/api/users/1?force=1")
            .body(Body::empty())
            .unwrap();

        let err = block_on(Query::<DeleteParams>::from_request(&mut parts(request)))
            .err()
            .unwrap();

        assert!(err.is_invalid_input_error());
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn well_formed_query_is_extracted() {
        let request = Request::builder()
            .uri("/api/users/1?force=true")
            .body(Body::empty())
            .unwrap();

        let Query(params) = block_on(Query::<DeleteParams>::from_request(&mut parts(request)))
            .ok()
            .unwrap();

        assert!(params.force);
    }

    #[test]
    fn body_without_json_content_type_is_invalid_input() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/contracts")
            .body(Body::from(r#"{"title":"T"}"#))
            .unwrap();

        let err = block_on(Json::<serde_json::Value>::from_request(&mut parts(request)))
            .err()
            .unwrap();

        assert!(err.is_invalid_input_error());
    }
}
