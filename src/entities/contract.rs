use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    pub merchant_id: Option<Uuid>,
    pub carrier_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub terms: String,
    pub value: Option<f64>,
    pub status: Status,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Draft,
    PendingSignature,
    Active,
    Terminated,
    Expired,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::PendingSignature => "PENDING_SIGNATURE",
            Self::Active => "ACTIVE",
            Self::Terminated => "TERMINATED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "PENDING_SIGNATURE" => Ok(Self::PendingSignature),
            "ACTIVE" => Ok(Self::Active),
            "TERMINATED" => Ok(Self::Terminated),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(invalid_input_error(format!("unknown contract status {}", s))),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    pub merchant_id: Option<Uuid>,
    pub carrier_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub terms: String,
    pub value: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl NewContract {
    /// The member the contract is issued to.
    pub fn holder_id(&self) -> Result<Uuid, Error> {
        match (self.merchant_id, self.carrier_id) {
            (Some(id), None) | (None, Some(id)) => Ok(id),
            _ => Err(invalid_input_error(
                "exactly one of merchantId or carrierId must be set",
            )),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractChanges {
    pub status: Option<Status>,
    pub value: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFilter {
    pub status: Option<Status>,
    pub member_id: Option<Uuid>,
}

impl Contract {
    pub fn new(params: NewContract) -> Result<Self, Error> {
        params.holder_id()?;

        for (field, value) in [
            ("title", &params.title),
            ("content", &params.content),
            ("terms", &params.terms),
        ] {
            if value.trim().is_empty() {
                return Err(invalid_input_error(format!("{} is required", field)));
            }
        }

        validate_value(params.value)?;
        validate_period(params.start_date, params.end_date)?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            merchant_id: params.merchant_id,
            carrier_id: params.carrier_id,
            title: params.title,
            content: params.content,
            terms: params.terms,
            value: params.value,
            status: Status::PendingSignature,
            start_date: params.start_date,
            end_date: params.end_date,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn holder_id(&self) -> Uuid {
        // one of the two is always set, see NewContract::holder_id
        self.merchant_id.or(self.carrier_id).unwrap_or_default()
    }

    pub fn apply(&mut self, changes: ContractChanges) -> Result<(), Error> {
        validate_value(changes.value)?;

        let start_date = changes.start_date.or(self.start_date);
        let end_date = changes.end_date.or(self.end_date);
        validate_period(start_date, end_date)?;

        if let Some(status) = changes.status {
            self.status = status;
        }

        if changes.value.is_some() {
            self.value = changes.value;
        }

        self.start_date = start_date;
        self.end_date = end_date;
        self.updated_at = Utc::now();

        Ok(())
    }

    pub fn ensure_deletable(&self) -> Result<(), Error> {
        if self.status != Status::Draft {
            return Err(invalid_input_error("Only DRAFT contracts can be deleted"));
        }

        Ok(())
    }
}

fn validate_value(value: Option<f64>) -> Result<(), Error> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(invalid_input_error("value must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

fn validate_period(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<(), Error> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err(invalid_input_error("endDate must not be before startDate"))
        }
        _ => Ok(()),
    }
}
