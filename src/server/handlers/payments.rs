use axum::extract::Extension;
use axum::http::StatusCode;

use crate::api::{DynAPI, PaymentAPI};
use crate::entities::{NewPayment, Payment, PaymentFilter};
use crate::error::Error;
use crate::server::extract::{Json, Query, Session};

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(filter): Query<PaymentFilter>,
) -> Result<Json<Vec<Payment>>, Error> {
    let payments = api.list_payments(user, filter).await?;

    Ok(payments.into())
}

pub async fn record(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(params): Json<NewPayment>,
) -> Result<(StatusCode, Json<Payment>), Error> {
    let payment = api.record_payment(user, params).await?;

    Ok((StatusCode::CREATED, payment.into()))
}
