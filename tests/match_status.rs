mod support;

use cargolink::api::MatchAPI;
use cargolink::entities::{Match, MatchStatus, NewMatch, Role, UserType};
use tokio_test::block_on;

async fn proposed(h: &support::Harness) -> Match {
    let sender = h.member(Role::Customer, UserType::Individual).await;
    let carrier = h.member(Role::Carrier, UserType::Professional).await;
    let package = h.package(&sender).await;
    let ride = h.ride(&carrier).await;

    h.engine
        .create_match(
            h.admin.clone(),
            NewMatch {
                package_id: package.id,
                ride_id: ride.id,
                price: Some(12.0),
                proposed_by_id: Some(carrier.id),
            },
        )
        .await
        .unwrap()
}

async fn set(h: &support::Harness, m: &Match, status: MatchStatus) -> Result<Match, cargolink::error::Error> {
    h.engine
        .update_match_status(h.admin.clone(), m.id, status.name().to_string())
        .await
}

#[test]
fn terminal_matches_reject_every_change() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let paths: [&[MatchStatus]; 3] = [
            &[MatchStatus::AcceptedBySender, MatchStatus::Confirmed],
            &[MatchStatus::Rejected],
            &[MatchStatus::AcceptedByCarrier, MatchStatus::Cancelled],
        ];

        for path in paths {
            let m = proposed(&h).await;

            for status in path {
                set(&h, &m, *status).await.unwrap();
            }

            let terminal = *path.last().unwrap();

            for next in MatchStatus::ALL {
                let err = set(&h, &m, next).await.unwrap_err();
                assert!(err.is_invalid_state_error(), "{} -> {}", terminal, next);
                assert_eq!(err.details.as_ref().unwrap()["from"], terminal.name());
            }

            let stored = h.engine.find_match(h.admin.clone(), m.id).await.unwrap();
            assert_eq!(stored.status, terminal);
        }
    });
}

#[test]
fn unknown_status_is_invalid_input() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let m = proposed(&h).await;

        let err = h
            .engine
            .update_match_status(h.admin.clone(), m.id, "SHIPPED".into())
            .await
            .unwrap_err();

        assert!(err.is_invalid_input_error());
    });
}

#[test]
fn missing_match_is_not_found() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let err = h
            .engine
            .update_match_status(h.admin.clone(), uuid::Uuid::new_v4(), "CONFIRMED".into())
            .await
            .unwrap_err();

        assert!(err.is_not_found_error());
    });
}

#[test]
fn concurrent_updates_are_serialized() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let m = proposed(&h).await;

        // both are legal from PROPOSED but not from each other
        let (accepted, rejected) = futures::join!(
            set(&h, &m, MatchStatus::AcceptedBySender),
            set(&h, &m, MatchStatus::Rejected),
        );

        assert!(accepted.is_ok() ^ rejected.is_ok());

        let stored = h.engine.find_match(h.admin.clone(), m.id).await.unwrap();
        let winner = match (accepted, rejected) {
            (Ok(m), _) | (_, Ok(m)) => m,
            _ => unreachable!(),
        };
        assert_eq!(stored.status, winner.status);
    });
}
