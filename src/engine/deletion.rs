//! Ordered removal of everything a member owns.
//!
//! Steps run inside the caller's transaction, children before parents, so
//! no foreign key is ever violated on the way down to the member row.

use super::Database;

use sqlx::{Executor, Row, Transaction};
use uuid::Uuid;

use crate::{
    entities::{DeletionReport, Relations},
    error::Error,
};

pub struct Step {
    pub name: &'static str,
    sql: &'static str,
}

pub const STEPS: &[Step] = &[
    Step {
        name: "match_payments",
        sql: "DELETE FROM payments WHERE match_id IN (
            SELECT m.id FROM matches m
            WHERE m.package_id IN (SELECT id FROM packages WHERE sender_id = $1)
               OR m.ride_id IN (SELECT id FROM rides WHERE carrier_id = $1))",
    },
    Step {
        name: "payments",
        sql: "DELETE FROM payments WHERE member_id = $1",
    },
    Step {
        name: "matches",
        sql: "DELETE FROM matches
            WHERE package_id IN (SELECT id FROM packages WHERE sender_id = $1)
               OR ride_id IN (SELECT id FROM rides WHERE carrier_id = $1)",
    },
    Step {
        name: "packages",
        sql: "DELETE FROM packages WHERE sender_id = $1",
    },
    Step {
        name: "rides",
        sql: "DELETE FROM rides WHERE carrier_id = $1",
    },
    Step {
        name: "contracts",
        sql: "DELETE FROM contracts WHERE merchant_id = $1 OR carrier_id = $1",
    },
    Step {
        name: "bookings",
        sql: "DELETE FROM bookings
            WHERE customer_id = $1
               OR service_id IN (SELECT id FROM services WHERE provider_id = $1)",
    },
    Step {
        name: "notifications",
        sql: "DELETE FROM notifications WHERE member_id = $1",
    },
    Step {
        name: "messages",
        sql: "DELETE FROM messages WHERE sender_id = $1 OR recipient_id = $1",
    },
    Step {
        name: "documents",
        sql: "DELETE FROM documents WHERE member_id = $1",
    },
    Step {
        name: "services",
        sql: "DELETE FROM services WHERE provider_id = $1",
    },
    Step {
        name: "box_rentals",
        sql: "DELETE FROM box_rentals WHERE member_id = $1",
    },
    Step {
        name: "subscriptions",
        sql: "DELETE FROM subscriptions WHERE member_id = $1",
    },
    Step {
        name: "products",
        sql: "DELETE FROM products WHERE merchant_id = $1",
    },
    Step {
        name: "sessions",
        sql: "DELETE FROM sessions WHERE member_id = $1",
    },
    Step {
        name: "members",
        sql: "DELETE FROM members WHERE id = $1",
    },
];

#[tracing::instrument(skip(tx))]
pub async fn count_relations(
    tx: &mut Transaction<'_, Database>,
    member_id: &Uuid,
) -> Result<Relations, Error> {
    let row = tx
        .fetch_one(
            sqlx::query(
                "SELECT
                    (SELECT COUNT(*) FROM packages WHERE sender_id = $1) AS packages,
                    (SELECT COUNT(*) FROM rides WHERE carrier_id = $1) AS rides,
                    (SELECT COUNT(*) FROM payments WHERE member_id = $1) AS payments,
                    (SELECT COUNT(*) FROM contracts
                        WHERE merchant_id = $1 OR carrier_id = $1) AS contracts,
                    (SELECT COUNT(*) FROM bookings
                        WHERE customer_id = $1
                           OR service_id IN (SELECT id FROM services WHERE provider_id = $1)) AS bookings",
            )
            .bind(member_id),
        )
        .await?;

    Ok(Relations {
        packages: row.try_get("packages")?,
        rides: row.try_get("rides")?,
        payments: row.try_get("payments")?,
        contracts: row.try_get("contracts")?,
        bookings: row.try_get("bookings")?,
    })
}

/// Names of the generated files owned by the member, read before their rows go.
#[tracing::instrument(skip(tx))]
pub async fn document_files(
    tx: &mut Transaction<'_, Database>,
    member_id: &Uuid,
) -> Result<Vec<String>, Error> {
    let rows = tx
        .fetch_all(sqlx::query("SELECT filename FROM documents WHERE member_id = $1").bind(member_id))
        .await?;

    rows.iter()
        .map(|row| row.try_get::<String, _>("filename").map_err(Error::from))
        .collect()
}

#[tracing::instrument(skip(tx, report))]
pub async fn run(
    tx: &mut Transaction<'_, Database>,
    member_id: &Uuid,
    report: &mut DeletionReport,
) -> Result<(), Error> {
    for step in STEPS {
        let rows = tx
            .execute(sqlx::query(step.sql).bind(member_id))
            .await?
            .rows_affected();

        tracing::debug!(step = step.name, rows, "deleted");

        report.record(step.name, rows);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(name: &str) -> usize {
        STEPS
            .iter()
            .position(|s| s.name == name)
            .unwrap_or_else(|| panic!("missing step {}", name))
    }

    #[test]
    fn children_go_before_parents() {
        assert!(position("match_payments") < position("matches"));
        assert!(position("matches") < position("packages"));
        assert!(position("matches") < position("rides"));
        assert!(position("bookings") < position("services"));
        assert!(position("payments") < position("members"));
    }

    #[test]
    fn member_row_goes_last() {
        assert_eq!(STEPS.last().map(|s| s.name), Some("members"));
        assert!(position("sessions") < position("members"));
    }

    #[test]
    fn every_member_owned_table_is_covered() {
        for table in [
            "payments",
            "matches",
            "packages",
            "rides",
            "contracts",
            "bookings",
            "notifications",
            "messages",
            "documents",
            "services",
            "box_rentals",
            "subscriptions",
            "products",
            "sessions",
        ] {
            position(table);
        }
    }

    #[test]
    fn step_names_are_unique() {
        for (i, step) in STEPS.iter().enumerate() {
            assert_eq!(position(step.name), i);
        }
    }

    #[test]
    fn every_step_is_scoped_to_the_member() {
        for step in STEPS {
            assert!(step.sql.starts_with("DELETE FROM"), "{}", step.name);
            assert!(step.sql.contains("$1"), "{}", step.name);
        }
    }
}
