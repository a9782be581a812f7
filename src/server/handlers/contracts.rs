use axum::extract::Extension;
use axum::http::StatusCode;
use uuid::Uuid;

use super::IdQuery;
use crate::api::{ContractAPI, DynAPI};
use crate::entities::{Contract, ContractChanges, ContractFilter, NewContract};
use crate::error::Error;
use crate::server::extract::{Json, Path, Query, Session};

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(filter): Query<ContractFilter>,
) -> Result<Json<Vec<Contract>>, Error> {
    let contracts = api.list_contracts(user, filter).await?;

    Ok(contracts.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Contract>, Error> {
    let contract = api.find_contract(user, id).await?;

    Ok(contract.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(params): Json<NewContract>,
) -> Result<(StatusCode, Json<Contract>), Error> {
    let contract = api.create_contract(user, params).await?;

    Ok((StatusCode::CREATED, contract.into()))
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(query): Query<IdQuery>,
    Json(changes): Json<ContractChanges>,
) -> Result<Json<Contract>, Error> {
    let contract = api.update_contract(user, query.required()?, changes).await?;

    Ok(contract.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, Error> {
    api.delete_contract(user, query.required()?).await?;

    Ok(StatusCode::NO_CONTENT)
}
