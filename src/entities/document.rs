use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Public path prefix under which generated files are served.
pub const PUBLIC_PREFIX: &str = "/documents";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub member_id: Uuid,
    pub document_type: DocumentType,
    pub related_entity_id: Option<Uuid>,
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Contract,
    Invoice,
}

impl DocumentType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Contract => "CONTRACT",
            Self::Invoice => "INVOICE",
        }
    }

    /// `<type>_<entityId>_<timestamp>.pdf`
    pub fn file_name(&self, entity_id: &Uuid, generated_at: DateTime<Utc>) -> String {
        format!(
            "{}_{}_{}.pdf",
            self.name().to_lowercase(),
            entity_id,
            generated_at.timestamp_millis()
        )
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub document_type: DocumentType,
    pub entity_id: Uuid,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    pub member_id: Option<Uuid>,
    pub document_type: Option<DocumentType>,
    pub related_entity_id: Option<Uuid>,
}

impl Document {
    pub fn new(
        member_id: Uuid,
        document_type: DocumentType,
        related_entity_id: Uuid,
        filename: String,
        file_size: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            document_type,
            related_entity_id: Some(related_entity_id),
            file_path: format!("{}/{}", PUBLIC_PREFIX, filename),
            filename,
            file_size,
            mime_type: PDF_MIME_TYPE.into(),
            created_at: Utc::now(),
        }
    }
}
