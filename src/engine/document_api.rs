use super::helpers::{decode_all, fetch_data};
use super::Engine;

use std::io::{self, ErrorKind};
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::io::AsyncWriteExt;
use sqlx::{types::Json, Executor, Row};
use uuid::Uuid;

use crate::{
    api::DocumentAPI,
    auth::{Platform, User},
    entities::{Contract, Document, DocumentFilter, DocumentRequest, DocumentType, Member, Payment},
    error::{invalid_input_error, not_found_error, unexpected_error, Error},
    pdf,
};

const FILENAME_ATTEMPTS: i64 = 16;

/// Writes `bytes` to a file name no other document holds yet, stepping the
/// timestamp one millisecond at a time while the name is taken.
async fn write_new_file(
    dir: &Path,
    document_type: DocumentType,
    entity_id: &Uuid,
    generated_at: DateTime<Utc>,
    bytes: &[u8],
) -> Result<String, Error> {
    for attempt in 0..FILENAME_ATTEMPTS {
        let filename = document_type.file_name(entity_id, generated_at + Duration::milliseconds(attempt));
        let path = dir.join(&filename);

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        };

        let written = match file.write_all(bytes).await {
            Ok(()) => file.flush().await,
            Err(err) => Err(err),
        };

        if let Err(err) = written {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                tracing::warn!(%filename, "could not remove partial document file: {}", cleanup);
            }
            return Err(err.into());
        }

        return Ok(filename);
    }

    Err(io::Error::new(ErrorKind::AlreadyExists, "no free document file name").into())
}

#[async_trait]
impl DocumentAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_documents(
        &self,
        user: User,
        filter: DocumentFilter,
    ) -> Result<Vec<Document>, Error> {
        self.authorize(user, "manage_documents", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM documents
                     WHERE ($1::UUID IS NULL OR member_id = $1)
                       AND ($2::VARCHAR IS NULL OR document_type = $2)
                       AND ($3::UUID IS NULL OR related_entity_id = $3)
                     ORDER BY created_at DESC",
                )
                .bind(filter.member_id)
                .bind(filter.document_type.map(|t| t.name()))
                .bind(filter.related_entity_id),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn generate_document(
        &self,
        user: User,
        request: DocumentRequest,
    ) -> Result<Document, Error> {
        self.authorize(user, "manage_documents", Platform::default())?;

        let logo = self.logo.clone();

        let (owner_id, bytes) = match request.document_type {
            DocumentType::Contract => {
                let contract: Contract =
                    fetch_data(&self.pool, "contracts", &request.entity_id, "contract").await?;
                let holder: Member =
                    fetch_data(&self.pool, "members", &contract.holder_id(), "user").await?;

                if !holder.is_professional() {
                    return Err(invalid_input_error(
                        "contract documents can only be generated for PROFESSIONAL users",
                    ));
                }

                let owner_id = holder.id;
                let bytes = tokio::task::spawn_blocking(move || {
                    pdf::render_contract(&contract, &holder, logo.as_deref())
                })
                .await
                .map_err(|_| unexpected_error())??;

                (owner_id, bytes)
            }
            DocumentType::Invoice => {
                let payment: Payment =
                    fetch_data(&self.pool, "payments", &request.entity_id, "payment").await?;
                let payer: Member =
                    fetch_data(&self.pool, "members", &payment.member_id, "user").await?;

                let owner_id = payer.id;
                let bytes = tokio::task::spawn_blocking(move || {
                    pdf::render_invoice(&payment, &payer, logo.as_deref())
                })
                .await
                .map_err(|_| unexpected_error())??;

                (owner_id, bytes)
            }
        };

        let mut conn = self.pool.acquire().await?;

        let filename = write_new_file(
            &self.documents_dir,
            request.document_type,
            &request.entity_id,
            Utc::now(),
            &bytes,
        )
        .await?;

        let document = Document::new(
            owner_id,
            request.document_type,
            request.entity_id,
            filename,
            bytes.len() as i64,
        );

        let inserted = conn
            .execute(
                sqlx::query(
                    "INSERT INTO documents
                        (id, member_id, document_type, related_entity_id, filename, created_at, data)
                     VALUES ($1, $2, $3, $4, $5, $6, $7)",
                )
                .bind(&document.id)
                .bind(&document.member_id)
                .bind(document.document_type.name())
                .bind(document.related_entity_id)
                .bind(&document.filename)
                .bind(document.created_at)
                .bind(Json(&document)),
            )
            .await;

        if let Err(err) = inserted {
            // no row, no file
            self.remove_file(&document.filename).await;
            return Err(err.into());
        }

        tracing::info!(
            document_id = %document.id,
            filename = %document.filename,
            size = document.file_size,
            "document generated"
        );

        Ok(document)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_document(&self, user: User, id: Uuid) -> Result<(), Error> {
        self.authorize(user, "manage_documents", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let row = conn
            .fetch_optional(
                sqlx::query("DELETE FROM documents WHERE id = $1 RETURNING filename").bind(&id),
            )
            .await?
            .ok_or_else(|| not_found_error("document"))?;

        let filename: String = row.try_get("filename")?;
        self.remove_file(&filename).await;

        Ok(())
    }
}

impl Engine {
    /// Removes a generated file from the documents directory. A missing file
    /// is not an error; anything else is logged and swallowed. Returns whether
    /// a file was removed.
    pub(super) async fn remove_file(&self, filename: &str) -> bool {
        match tokio::fs::remove_file(self.documents_dir.join(filename)).await {
            Ok(()) => true,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(filename, "document file already gone");
                false
            }
            Err(err) => {
                tracing::warn!(filename, "could not remove document file: {}", err);
                false
            }
        }
    }
}
