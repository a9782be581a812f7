use axum::extract::Extension;
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{DynAPI, MemberAPI};
use crate::entities::{
    DeletionReport, Member, MemberChanges, MemberFilter, NewMember, NewNotification, Notification,
};
use crate::error::Error;
use crate::server::extract::{Json, Path, Query, Session};

#[derive(Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    force: bool,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(filter): Query<MemberFilter>,
) -> Result<Json<Vec<Member>>, Error> {
    let members = api.list_members(user, filter).await?;

    Ok(members.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(params): Json<NewMember>,
) -> Result<(StatusCode, Json<Member>), Error> {
    let member = api.create_member(user, params).await?;

    Ok((StatusCode::CREATED, member.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Member>, Error> {
    let member = api.find_member(user, id).await?;

    Ok(member.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
    Json(changes): Json<MemberChanges>,
) -> Result<Json<Member>, Error> {
    let member = api.update_member(user, id, changes).await?;

    Ok(member.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeletionReport>, Error> {
    let report = api.delete_member(user, id, params.force).await?;

    Ok(report.into())
}

pub async fn notify(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
    Json(params): Json<NewNotification>,
) -> Result<(StatusCode, Json<Notification>), Error> {
    let notification = api.notify_member(user, id, params).await?;

    Ok((StatusCode::CREATED, notification.into()))
}
