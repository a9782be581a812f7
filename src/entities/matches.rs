use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_input_error, invalid_transition_error, Error};

/// Pairs a sender's package with a carrier's ride.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub package_id: Uuid,
    pub ride_id: Uuid,
    pub status: Status,
    pub price: Option<f64>,
    pub proposed_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Proposed,
    AcceptedBySender,
    AcceptedByCarrier,
    Confirmed,
    Rejected,
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Self::Proposed,
        Self::AcceptedBySender,
        Self::AcceptedByCarrier,
        Self::Confirmed,
        Self::Rejected,
        Self::Cancelled,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Proposed => "PROPOSED",
            Self::AcceptedBySender => "ACCEPTED_BY_SENDER",
            Self::AcceptedByCarrier => "ACCEPTED_BY_CARRIER",
            Self::Confirmed => "CONFIRMED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Statuses reachable in one step.
    pub fn successors(&self) -> &'static [Status] {
        match self {
            Self::Proposed => &[
                Self::AcceptedBySender,
                Self::AcceptedByCarrier,
                Self::Rejected,
                Self::Cancelled,
            ],
            Self::AcceptedBySender | Self::AcceptedByCarrier => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed | Self::Rejected | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: Status) -> bool {
        self.successors().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.name() == s)
            .ok_or_else(|| invalid_input_error(format!("unknown match status {}", s)))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub package_id: Uuid,
    pub ride_id: Uuid,
    pub price: Option<f64>,
    pub proposed_by_id: Option<Uuid>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFilter {
    pub status: Option<Status>,
    pub package_id: Option<Uuid>,
    pub ride_id: Option<Uuid>,
}

impl Match {
    pub fn new(params: &NewMatch) -> Result<Self, Error> {
        if let Some(price) = params.price {
            if !price.is_finite() || price < 0.0 {
                return Err(invalid_input_error("price must be a non-negative number"));
            }
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            package_id: params.package_id,
            ride_id: params.ride_id,
            status: Status::Proposed,
            price: params.price,
            proposed_by_id: params.proposed_by_id,
            created_at: now,
            updated_at: now,
        })
    }

    #[tracing::instrument]
    pub fn transition(&mut self, next: Status) -> Result<(), Error> {
        if !self.status.can_transition_to(next) {
            return Err(invalid_transition_error(self.status.name(), next.name()));
        }

        self.status = next;
        self.updated_at = Utc::now();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposed() -> Match {
        Match::new(&NewMatch {
            package_id: Uuid::new_v4(),
            ride_id: Uuid::new_v4(),
            price: Some(25.0),
            proposed_by_id: None,
        })
        .unwrap()
    }

    #[test]
    fn new_match_starts_proposed() {
        assert_eq!(proposed().status, Status::Proposed);
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = Match::new(&NewMatch {
            package_id: Uuid::new_v4(),
            ride_id: Uuid::new_v4(),
            price: Some(-1.0),
            proposed_by_id: None,
        });
        assert!(result.unwrap_err().is_invalid_input_error());
    }

    #[test]
    fn sender_acceptance_then_confirmation() {
        let mut m = proposed();
        m.transition(Status::AcceptedBySender).unwrap();
        m.transition(Status::Confirmed).unwrap();
        assert_eq!(m.status, Status::Confirmed);
    }

    #[test]
    fn carrier_acceptance_can_be_cancelled() {
        let mut m = proposed();
        m.transition(Status::AcceptedByCarrier).unwrap();
        m.transition(Status::Cancelled).unwrap();
        assert_eq!(m.status, Status::Cancelled);
    }

    #[test]
    fn rejection_only_from_proposed() {
        let mut m = proposed();
        m.transition(Status::AcceptedBySender).unwrap();
        let err = m.transition(Status::Rejected).unwrap_err();
        assert!(err.is_invalid_state_error());
        assert_eq!(m.status, Status::AcceptedBySender);
    }

    #[test]
    fn proposed_cannot_jump_to_confirmed() {
        let mut m = proposed();
        assert!(m.transition(Status::Confirmed).is_err());
        assert_eq!(m.status, Status::Proposed);
    }

    #[test]
    fn terminal_states_reject_every_target() {
        for terminal in [Status::Confirmed, Status::Rejected, Status::Cancelled] {
            assert!(terminal.is_terminal());

            for target in Status::ALL {
                let mut m = proposed();
                m.status = terminal;

                let err = m.transition(target).unwrap_err();
                assert!(err.is_invalid_state_error());
                assert_eq!(m.status, terminal);
            }
        }
    }

    #[test]
    fn self_transitions_are_not_legal() {
        for status in Status::ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn status_parses_from_wire_names() {
        assert_eq!(
            "ACCEPTED_BY_CARRIER".parse::<Status>().unwrap(),
            Status::AcceptedByCarrier
        );
        assert!("accepted".parse::<Status>().unwrap_err().is_invalid_input_error());
    }

    #[test]
    fn status_serializes_as_wire_name() {
        for status in Status::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.name());
        }
    }
}
