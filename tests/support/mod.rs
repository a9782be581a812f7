//! Shared setup for tests that need Postgres. They run only when
//! `TEST_DATABASE_URL` points at a disposable database.

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{Duration, Utc};
use sqlx::{Executor, Pool, Postgres, Row};
use uuid::Uuid;

use cargolink::api::{LogisticsAPI, MemberAPI};
use cargolink::auth::User;
use cargolink::config::{AuthConfig, Config};
use cargolink::db::PgPool;
use cargolink::engine::Engine;
use cargolink::entities::{
    Member, NewMember, NewPackage, NewRide, Package, Ride, Role, UserType,
};

pub const PASSWORD: &str = "correct horse battery";

pub struct Harness {
    pub engine: Engine,
    /// Separate handle for seeding tables the API does not write and for
    /// checking what is left behind.
    pub pool: Pool<Postgres>,
    pub admin: User,
    pub config: Config,
}

pub fn config(database_url: String) -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_url,
        max_connections: 2,
        auth: AuthConfig {
            session_secret: "test-session-secret".into(),
            api_secret: "test-api-secret".into(),
            session_ttl: Duration::hours(1),
            bcrypt_cost: 4,
        },
        documents_dir: std::env::temp_dir().join(format!("cargolink-{}", Uuid::new_v4())),
    }
}

pub async fn harness() -> Option<Harness> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL is not set, skipping");
            return None;
        }
    };

    let config = config(database_url);

    let PgPool(pool) = PgPool::new(&config.database_url, config.max_connections)
        .await
        .unwrap();
    let engine = Engine::new(pool.clone(), &config).await.unwrap();

    Some(Harness {
        engine,
        pool,
        admin: User::new(Uuid::new_v4(), Role::Admin),
        config,
    })
}

impl Harness {
    pub async fn member(&self, role: Role, user_type: UserType) -> Member {
        self.engine
            .create_member(
                self.admin.clone(),
                NewMember {
                    email: format!("{}@example.com", Uuid::new_v4()),
                    name: format!("{} account", role.name().to_lowercase()),
                    password: PASSWORD.into(),
                    phone: None,
                    role,
                    user_type,
                },
            )
            .await
            .unwrap()
    }

    pub async fn package(&self, sender: &Member) -> Package {
        self.engine
            .create_package(
                self.admin.clone(),
                NewPackage {
                    sender_id: sender.id,
                    title: "Books".into(),
                    description: None,
                    weight_kg: 4.5,
                    pickup_address: "1 rue de Rivoli, Paris".into(),
                    delivery_address: "2 place Bellecour, Lyon".into(),
                },
            )
            .await
            .unwrap()
    }

    pub async fn ride(&self, carrier: &Member) -> Ride {
        self.engine
            .create_ride(
                self.admin.clone(),
                NewRide {
                    carrier_id: carrier.id,
                    origin: "Paris".into(),
                    destination: "Lyon".into(),
                    departure_time: Utc::now() + Duration::days(2),
                    capacity_kg: 50.0,
                    price_per_kg: Some(1.5),
                },
            )
            .await
            .unwrap()
    }

    pub async fn exists(&self, table: &str, id: &Uuid) -> bool {
        let query = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1) AS found", table);

        self.pool
            .fetch_one(sqlx::query(&query).bind(id))
            .await
            .unwrap()
            .get("found")
    }

    pub async fn count(&self, sql: &str, id: &Uuid) -> i64 {
        self.pool
            .fetch_one(sqlx::query(sql).bind(id))
            .await
            .unwrap()
            .get(0)
    }

    /// A provider service with one booking on it by `customer`.
    pub async fn booking(&self, provider: &Member, customer: &Member) -> (Uuid, Uuid) {
        let service_id = Uuid::new_v4();
        let booking_id = Uuid::new_v4();

        self.pool
            .execute(
                sqlx::query("INSERT INTO services (id, provider_id, data) VALUES ($1, $2, '{}')")
                    .bind(&service_id)
                    .bind(&provider.id),
            )
            .await
            .unwrap();

        self.pool
            .execute(
                sqlx::query(
                    "INSERT INTO bookings (id, customer_id, service_id, status, created_at, data)
                     VALUES ($1, $2, $3, 'PENDING', now(), $4)",
                )
                .bind(&booking_id)
                .bind(&customer.id)
                .bind(&service_id)
                .bind(serde_json::json!({
                    "id": booking_id,
                    "customerId": customer.id,
                    "serviceId": service_id,
                    "status": "PENDING",
                    "totalPrice": 30.0,
                    "scheduledAt": Utc::now(),
                    "createdAt": Utc::now(),
                })),
            )
            .await
            .unwrap();

        (service_id, booking_id)
    }

    /// A catalogue entry for `merchant`. Products have no create operation.
    pub async fn product(&self, merchant: &Member) -> Uuid {
        let id = Uuid::new_v4();

        self.pool
            .execute(
                sqlx::query(
                    "INSERT INTO products (id, merchant_id, created_at, data) VALUES ($1, $2, now(), $3)",
                )
                .bind(&id)
                .bind(&merchant.id)
                .bind(serde_json::json!({
                    "id": id,
                    "merchantId": merchant.id,
                    "name": "Shipping box",
                    "description": null,
                    "price": 3.5,
                    "stock": 120,
                    "createdAt": Utc::now(),
                })),
            )
            .await
            .unwrap();

        id
    }

    /// Moves a row's creation time `days` into the past.
    pub async fn backdate(&self, table: &str, id: &Uuid, days: i64) {
        let query = format!(
            "UPDATE {} SET created_at = now() - make_interval(days => $2) WHERE id = $1",
            table
        );

        self.pool
            .execute(sqlx::query(&query).bind(id).bind(days as i32))
            .await
            .unwrap();
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.config.documents_dir.clone()
    }
}
