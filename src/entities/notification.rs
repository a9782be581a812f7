use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub member_id: Uuid,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(member_id: Uuid, params: NewNotification) -> Result<Self, Error> {
        if params.title.trim().is_empty() || params.message.trim().is_empty() {
            return Err(invalid_input_error("title and message are required"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            member_id,
            title: params.title,
            message: params.message,
            read: false,
            created_at: Utc::now(),
        })
    }
}
