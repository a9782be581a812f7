use axum::extract::Extension;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::api::{DynAPI, LogisticsAPI};
use crate::entities::{NewPackage, Package, PackageFilter};
use crate::error::Error;
use crate::server::extract::{Json, Path, Query, Session};

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(filter): Query<PackageFilter>,
) -> Result<Json<Vec<Package>>, Error> {
    let packages = api.list_packages(user, filter).await?;

    Ok(packages.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Package>, Error> {
    let package = api.find_package(user, id).await?;

    Ok(package.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(params): Json<NewPackage>,
) -> Result<(StatusCode, Json<Package>), Error> {
    let package = api.create_package(user, params).await?;

    Ok((StatusCode::CREATED, package.into()))
}
