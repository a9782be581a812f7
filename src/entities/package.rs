use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub weight_kg: f64,
    pub pickup_address: String,
    pub delivery_address: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Matched,
    InTransit,
    Delivered,
    Cancelled,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Matched => "MATCHED",
            Self::InTransit => "IN_TRANSIT",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    pub sender_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub weight_kg: f64,
    pub pickup_address: String,
    pub delivery_address: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageFilter {
    pub status: Option<Status>,
    pub sender_id: Option<Uuid>,
}

impl Package {
    pub fn new(params: NewPackage) -> Result<Self, Error> {
        if params.title.trim().is_empty() {
            return Err(invalid_input_error("title is required"));
        }

        if !params.weight_kg.is_finite() || params.weight_kg <= 0.0 {
            return Err(invalid_input_error("weight must be a positive number"));
        }

        if params.pickup_address.trim().is_empty() || params.delivery_address.trim().is_empty() {
            return Err(invalid_input_error(
                "pickup and delivery addresses are required",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            sender_id: params.sender_id,
            title: params.title,
            description: params.description,
            weight_kg: params.weight_kg,
            pickup_address: params.pickup_address,
            delivery_address: params.delivery_address,
            status: Status::Pending,
            created_at: Utc::now(),
        })
    }
}
