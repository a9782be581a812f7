use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub member_id: Uuid,
    pub plan: Plan,
    pub status: Status,
    pub started_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    Free,
    Starter,
    Premium,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Active,
    Cancelled,
    Expired,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionChanges {
    pub plan: Option<Plan>,
    pub status: Option<Status>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionFilter {
    pub status: Option<Status>,
    pub member_id: Option<Uuid>,
}

impl Subscription {
    pub fn new(member_id: Uuid, plan: Plan) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            plan,
            status: Status::Active,
            started_at: Utc::now(),
            ends_at: None,
        }
    }

    pub fn apply(&mut self, changes: SubscriptionChanges) -> Result<(), Error> {
        if let Some(ends_at) = changes.ends_at {
            if ends_at < self.started_at {
                return Err(invalid_input_error("endsAt must not be before startedAt"));
            }
            self.ends_at = Some(ends_at);
        }

        if let Some(plan) = changes.plan {
            self.plan = plan;
        }

        if let Some(status) = changes.status {
            // cancelling closes the subscription now unless an end was given
            if status != Status::Active && self.ends_at.is_none() {
                self.ends_at = Some(Utc::now());
            }
            self.status = status;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn cancelling_sets_an_end_date() {
        let mut sub = Subscription::new(Uuid::new_v4(), Plan::Starter);
        sub.apply(SubscriptionChanges {
            status: Some(Status::Cancelled),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(sub.status, Status::Cancelled);
        assert!(sub.ends_at.is_some());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut sub = Subscription::new(Uuid::new_v4(), Plan::Free);
        let result = sub.apply(SubscriptionChanges {
            ends_at: Some(sub.started_at - Duration::days(1)),
            plan: Some(Plan::Premium),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(sub.plan, Plan::Free);
    }
}
