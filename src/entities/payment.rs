use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub member_id: Uuid,
    pub match_id: Option<Uuid>,
    pub amount: f64,
    pub currency: String,
    pub status: Status,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub member_id: Uuid,
    pub match_id: Option<Uuid>,
    pub amount: f64,
    pub currency: Option<String>,
    pub status: Option<Status>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilter {
    pub status: Option<Status>,
    pub member_id: Option<Uuid>,
}

const DEFAULT_CURRENCY: &str = "EUR";

impl Payment {
    pub fn new(params: NewPayment) -> Result<Self, Error> {
        if !params.amount.is_finite() || params.amount < 0.0 {
            return Err(invalid_input_error("amount must be a non-negative number"));
        }

        let currency = params
            .currency
            .map(|c| c.trim().to_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.into());

        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid_input_error(format!("invalid currency code {}", currency)));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            member_id: params.member_id,
            match_id: params.match_id,
            amount: params.amount,
            currency,
            status: params.status.unwrap_or(Status::Pending),
            description: params.description,
            created_at: Utc::now(),
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NewPayment {
        NewPayment {
            member_id: Uuid::new_v4(),
            match_id: None,
            amount: 42.5,
            currency: None,
            status: None,
            description: None,
        }
    }

    #[test]
    fn defaults_to_pending_euros() {
        let payment = Payment::new(params()).unwrap();
        assert_eq!(payment.currency, "EUR");
        assert_eq!(payment.status, Status::Pending);
        assert!(!payment.is_completed());
    }

    #[test]
    fn rejects_bad_currency_and_amount() {
        let mut p = params();
        p.currency = Some("euro".into());
        assert!(Payment::new(p).is_err());

        let mut p = params();
        p.amount = -3.0;
        assert!(Payment::new(p).is_err());
    }
}
