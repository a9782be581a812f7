pub mod analytics;
pub mod auth;
pub mod contracts;
pub mod customers;
pub mod documents;
pub mod matches;
pub mod merchants;
pub mod packages;
pub mod payments;
pub mod rides;
pub mod subscriptions;
pub mod users;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{invalid_input_error, Error};

/// `?id=` on collection routes that update or delete a single record.
#[derive(Deserialize)]
pub struct IdQuery {
    id: Option<Uuid>,
}

impl IdQuery {
    pub fn required(&self) -> Result<Uuid, Error> {
        self.id.ok_or_else(|| invalid_input_error("id query parameter is required"))
    }
}
