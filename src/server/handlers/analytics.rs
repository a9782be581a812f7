use axum::extract::Extension;
use serde::Deserialize;

use crate::api::{AnalyticsAPI, DynAPI};
use crate::error::Error;
use crate::server::extract::{Json, Query, Session};
use crate::stats::{Analytics, TimeRange};

#[derive(Deserialize)]
pub struct RangeParams {
    #[serde(default)]
    range: TimeRange,
}

pub async fn show(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(params): Query<RangeParams>,
) -> Result<Json<Analytics>, Error> {
    let analytics = api.analytics(user, params.range).await?;

    Ok(analytics.into())
}
