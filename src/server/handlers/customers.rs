use axum::extract::Extension;

use crate::api::{CustomerAPI, DynAPI};
use crate::entities::CustomerData;
use crate::error::Error;
use crate::server::extract::{Bearer, Json};

pub async fn data(
    Extension(api): Extension<DynAPI>,
    Bearer(user): Bearer,
) -> Result<Json<CustomerData>, Error> {
    let data = api.customer_data(user).await?;

    Ok(data.into())
}
