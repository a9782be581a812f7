use axum::extract::Extension;
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{DynAPI, SubscriptionAPI};
use crate::entities::{Plan, Subscription, SubscriptionChanges, SubscriptionFilter};
use crate::error::Error;
use crate::server::extract::{Json, Path, Query, Session};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    member_id: Uuid,
    plan: Plan,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(filter): Query<SubscriptionFilter>,
) -> Result<Json<Vec<Subscription>>, Error> {
    let subscriptions = api.list_subscriptions(user, filter).await?;

    Ok(subscriptions.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(params): Json<CreateParams>,
) -> Result<(StatusCode, Json<Subscription>), Error> {
    let subscription = api
        .create_subscription(user, params.member_id, params.plan)
        .await?;

    Ok((StatusCode::CREATED, subscription.into()))
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
    Json(changes): Json<SubscriptionChanges>,
) -> Result<Json<Subscription>, Error> {
    let subscription = api.update_subscription(user, id, changes).await?;

    Ok(subscription.into())
}
