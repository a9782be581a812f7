mod support;

use cargolink::api::{MatchAPI, MemberAPI, PaymentAPI};
use cargolink::engine::DELETION_STEPS;
use cargolink::entities::{NewMatch, NewNotification, NewPayment, PaymentStatus, Role, UserType};
use tokio_test::block_on;

#[test]
fn member_without_relations_is_deleted_without_force() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let member = h.member(Role::Customer, UserType::Individual).await;

        // notifications do not block a plain delete
        h.engine
            .notify_member(
                h.admin.clone(),
                member.id,
                NewNotification {
                    title: "Welcome".into(),
                    message: "Your account is ready".into(),
                },
            )
            .await
            .unwrap();

        let report = h
            .engine
            .delete_member(h.admin.clone(), member.id, false)
            .await
            .unwrap();

        assert!(!report.forced);
        assert_eq!(report.rows("members"), 1);
        assert_eq!(report.rows("notifications"), 1);
        assert_eq!(report.deleted.len(), DELETION_STEPS.len());
        assert!(!h.exists("members", &member.id).await);
    });
}

#[test]
fn member_with_packages_is_refused_without_force() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let sender = h.member(Role::Customer, UserType::Individual).await;
        let first = h.package(&sender).await;
        let second = h.package(&sender).await;

        let err = h
            .engine
            .delete_member(h.admin.clone(), sender.id, false)
            .await
            .unwrap_err();

        assert!(err.is_conflict_error());
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let details = err.details.expect("conflict carries details");
        assert_eq!(details["packages"], 2);
        assert_eq!(details["rides"], 0);
        assert_eq!(details["payments"], 0);
        assert_eq!(details["contracts"], 0);
        assert_eq!(details["bookings"], 0);

        assert!(h.exists("members", &sender.id).await);
        assert!(h.exists("packages", &first.id).await);
        assert!(h.exists("packages", &second.id).await);
    });
}

#[test]
fn provider_with_booked_services_is_refused_without_force() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let provider = h.member(Role::Provider, UserType::Professional).await;
        let customer = h.member(Role::Customer, UserType::Individual).await;

        let (service_id, booking_id) = h.booking(&provider, &customer).await;

        let err = h
            .engine
            .delete_member(h.admin.clone(), provider.id, false)
            .await
            .unwrap_err();

        assert!(err.is_conflict_error());
        assert_eq!(err.details.unwrap()["bookings"], 1);

        // someone else's booking must survive a plain delete
        assert!(h.exists("members", &provider.id).await);
        assert!(h.exists("services", &service_id).await);
        assert!(h.exists("bookings", &booking_id).await);
    });
}

#[test]
fn forced_delete_removes_the_whole_graph() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let sender = h.member(Role::Customer, UserType::Individual).await;
        let carrier = h.member(Role::Carrier, UserType::Professional).await;

        let package = h.package(&sender).await;
        let ride = h.ride(&carrier).await;

        let m = h
            .engine
            .create_match(
                h.admin.clone(),
                NewMatch {
                    package_id: package.id,
                    ride_id: ride.id,
                    price: Some(20.0),
                    proposed_by_id: Some(sender.id),
                },
            )
            .await
            .unwrap();

        // paid by the carrier, but hangs off the sender's match
        let payment = h
            .engine
            .record_payment(
                h.admin.clone(),
                NewPayment {
                    member_id: carrier.id,
                    match_id: Some(m.id),
                    amount: 20.0,
                    currency: None,
                    status: Some(PaymentStatus::Completed),
                    description: None,
                },
            )
            .await
            .unwrap();

        let (service_id, booking_id) = h.booking(&carrier, &sender).await;

        let report = h
            .engine
            .delete_member(h.admin.clone(), sender.id, true)
            .await
            .unwrap();

        assert!(report.forced);
        assert_eq!(report.rows("match_payments"), 1);
        assert_eq!(report.rows("matches"), 1);
        assert_eq!(report.rows("packages"), 1);
        assert_eq!(report.rows("bookings"), 1);

        assert!(!h.exists("members", &sender.id).await);
        assert!(!h.exists("packages", &package.id).await);
        assert!(!h.exists("matches", &m.id).await);
        assert!(!h.exists("payments", &payment.id).await);
        assert!(!h.exists("bookings", &booking_id).await);

        // the other side of the match survives
        assert!(h.exists("members", &carrier.id).await);
        assert!(h.exists("rides", &ride.id).await);
        assert!(h.exists("services", &service_id).await);
    });
}

#[test]
fn forced_delete_of_a_carrier_removes_rides_and_their_matches() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let sender = h.member(Role::Customer, UserType::Individual).await;
        let carrier = h.member(Role::Carrier, UserType::Professional).await;

        let package = h.package(&sender).await;
        let ride = h.ride(&carrier).await;

        let m = h
            .engine
            .create_match(
                h.admin.clone(),
                NewMatch {
                    package_id: package.id,
                    ride_id: ride.id,
                    price: None,
                    proposed_by_id: None,
                },
            )
            .await
            .unwrap();

        let (service_id, booking_id) = h.booking(&carrier, &sender).await;

        h.engine
            .delete_member(h.admin.clone(), carrier.id, true)
            .await
            .unwrap();

        assert!(!h.exists("members", &carrier.id).await);
        assert!(!h.exists("rides", &ride.id).await);
        assert!(!h.exists("matches", &m.id).await);
        assert!(!h.exists("services", &service_id).await);
        assert!(!h.exists("bookings", &booking_id).await);

        assert!(h.exists("packages", &package.id).await);
    });
}

#[test]
fn deleted_member_loses_open_sessions() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        use cargolink::api::AuthAPI;
        use cargolink::auth::Audience;

        let customer = h.member(Role::Customer, UserType::Individual).await;

        let token = h
            .engine
            .login(Audience::Public, customer.email.clone(), support::PASSWORD.into())
            .await
            .unwrap();

        h.engine
            .authenticate(Audience::Public, &token.access_token)
            .await
            .unwrap();

        h.engine
            .delete_member(h.admin.clone(), customer.id, false)
            .await
            .unwrap();

        let err = h
            .engine
            .authenticate(Audience::Public, &token.access_token)
            .await
            .unwrap_err();

        assert!(err.is_unauthenticated_error());
    });
}

#[test]
fn non_admins_cannot_delete_members() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let member = h.member(Role::Customer, UserType::Individual).await;
        let customer = cargolink::auth::User::new(member.id, Role::Customer);

        let err = h
            .engine
            .delete_member(customer, member.id, true)
            .await
            .unwrap_err();

        assert!(err.is_unauthorized_error());
        assert!(h.exists("members", &member.id).await);
    });
}

#[test]
fn deleting_an_unknown_member_is_not_found() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let err = h
            .engine
            .delete_member(h.admin.clone(), uuid::Uuid::new_v4(), true)
            .await
            .unwrap_err();

        assert!(err.is_not_found_error());
    });
}
