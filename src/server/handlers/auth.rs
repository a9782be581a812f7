use axum::extract::Extension;
use serde::Deserialize;

use crate::api::{AuthAPI, DynAPI};
use crate::auth::{Audience, Token};
use crate::error::Error;
use crate::server::extract::Json;

#[derive(Deserialize)]
pub struct LoginParams {
    email: String,
    password: String,
}

pub async fn login(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<LoginParams>,
) -> Result<Json<Token>, Error> {
    let token = api
        .login(Audience::Admin, params.email, params.password)
        .await?;

    Ok(token.into())
}

pub async fn public_login(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<LoginParams>,
) -> Result<Json<Token>, Error> {
    let token = api
        .login(Audience::Public, params.email, params.password)
        .await?;

    Ok(token.into())
}
