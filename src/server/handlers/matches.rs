use axum::extract::Extension;
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{DynAPI, MatchAPI};
use crate::entities::{Match, MatchFilter, NewMatch};
use crate::error::Error;
use crate::server::extract::{Json, Path, Query, Session};

#[derive(Deserialize)]
pub struct StatusParams {
    status: String,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(filter): Query<MatchFilter>,
) -> Result<Json<Vec<Match>>, Error> {
    let matches = api.list_matches(user, filter).await?;

    Ok(matches.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Match>, Error> {
    let m = api.find_match(user, id).await?;

    Ok(m.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(params): Json<NewMatch>,
) -> Result<(StatusCode, Json<Match>), Error> {
    let m = api.create_match(user, params).await?;

    Ok((StatusCode::CREATED, m.into()))
}

pub async fn update_status(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
    Json(params): Json<StatusParams>,
) -> Result<Json<Match>, Error> {
    let m = api.update_match_status(user, id, params.status).await?;

    Ok(m.into())
}
