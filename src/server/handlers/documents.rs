use axum::extract::Extension;
use axum::http::StatusCode;

use super::IdQuery;
use crate::api::{DocumentAPI, DynAPI};
use crate::entities::{Document, DocumentFilter, DocumentRequest};
use crate::error::Error;
use crate::server::extract::{Json, Query, Session};

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<Vec<Document>>, Error> {
    let documents = api.list_documents(user, filter).await?;

    Ok(documents.into())
}

pub async fn generate(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(request): Json<DocumentRequest>,
) -> Result<(StatusCode, Json<Document>), Error> {
    let document = api.generate_document(user, request).await?;

    Ok((StatusCode::CREATED, document.into()))
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, Error> {
    api.delete_document(user, query.required()?).await?;

    Ok(StatusCode::NO_CONTENT)
}
