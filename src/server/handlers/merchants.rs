use axum::extract::Extension;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::api::{DynAPI, MerchantAPI};
use crate::entities::{MerchantSummary, Product, ProductFilter};
use crate::error::Error;
use crate::server::extract::{Json, Path, Query, Session};

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<Vec<MerchantSummary>>, Error> {
    let merchants = api.list_merchants(user).await?;

    Ok(merchants.into())
}

pub async fn list_products(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, Error> {
    let products = api.list_products(user, filter).await?;

    Ok(products.into())
}

pub async fn find_product(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, Error> {
    let product = api.find_product(user, id).await?;

    Ok(product.into())
}

pub async fn delete_product(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    api.delete_product(user, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
