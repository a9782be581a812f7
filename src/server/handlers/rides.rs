use axum::extract::Extension;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::api::{DynAPI, LogisticsAPI};
use crate::entities::{NewRide, Ride, RideFilter};
use crate::error::Error;
use crate::server::extract::{Json, Path, Query, Session};

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(filter): Query<RideFilter>,
) -> Result<Json<Vec<Ride>>, Error> {
    let rides = api.list_rides(user, filter).await?;

    Ok(rides.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, Error> {
    let ride = api.find_ride(user, id).await?;

    Ok(ride.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(params): Json<NewRide>,
) -> Result<(StatusCode, Json<Ride>), Error> {
    let ride = api.create_ride(user, params).await?;

    Ok((StatusCode::CREATED, ride.into()))
}
