use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_input_error, Error};

/// A trip offered by a carrier that packages can be matched onto.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: Uuid,
    pub carrier_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub capacity_kg: f64,
    pub price_per_kg: Option<f64>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    Full,
    InProgress,
    Completed,
    Cancelled,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Full => "FULL",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRide {
    pub carrier_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub capacity_kg: f64,
    pub price_per_kg: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideFilter {
    pub status: Option<Status>,
    pub carrier_id: Option<Uuid>,
}

impl Ride {
    pub fn new(params: NewRide) -> Result<Self, Error> {
        if params.origin.trim().is_empty() || params.destination.trim().is_empty() {
            return Err(invalid_input_error("origin and destination are required"));
        }

        if !params.capacity_kg.is_finite() || params.capacity_kg <= 0.0 {
            return Err(invalid_input_error("capacity must be a positive number"));
        }

        if matches!(params.price_per_kg, Some(p) if !p.is_finite() || p < 0.0) {
            return Err(invalid_input_error("price per kg must not be negative"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            carrier_id: params.carrier_id,
            origin: params.origin,
            destination: params.destination,
            departure_time: params.departure_time,
            capacity_kg: params.capacity_kg,
            price_per_kg: params.price_per_kg,
            status: Status::Available,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ride_validation() {
        let params = NewRide {
            carrier_id: Uuid::new_v4(),
            origin: "Paris".into(),
            destination: "Marseille".into(),
            departure_time: Utc::now(),
            capacity_kg: 120.0,
            price_per_kg: Some(0.8),
        };

        let ride = Ride::new(params.clone()).unwrap();
        assert_eq!(ride.status, Status::Available);

        let mut bad = params.clone();
        bad.price_per_kg = Some(-2.0);
        assert!(Ride::new(bad).is_err());

        let mut bad = params;
        bad.capacity_kg = f64::NAN;
        assert!(Ride::new(bad).is_err());
    }
}
