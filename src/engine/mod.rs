mod analytics_api;
mod auth_api;
mod contract_api;
mod customer_api;
mod deletion;
mod document_api;
mod helpers;
mod logistics_api;
mod match_api;
mod member_api;
mod merchant_api;
mod payment_api;
mod subscription_api;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use oso::Oso;
use sqlx::{Executor, Pool, Postgres};

use crate::{
    api::API,
    auth::{authorizor, Audience, TokenKeys},
    config::Config,
    error::{unauthorized_error, Error},
    pdf::Logo,
};

pub use deletion::STEPS as DELETION_STEPS;

type Database = Postgres;

pub struct Engine {
    pool: Pool<Database>,
    authorizor: Oso,
    session_keys: TokenKeys,
    api_keys: TokenKeys,
    session_ttl: Duration,
    bcrypt_cost: u32,
    documents_dir: PathBuf,
    logo: Option<Arc<Logo>>,
}

const SCHEMA_LOCK: i64 = 0x6361_7267_6f6c;

// Every table keeps the columns it is queried or constrained by, plus the
// whole entity as JSONB. No foreign key cascades: member deletion removes
// dependents explicitly and in order.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS members (
        id UUID PRIMARY KEY,
        email VARCHAR NOT NULL UNIQUE,
        role VARCHAR NOT NULL,
        password_hash VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        id UUID PRIMARY KEY,
        member_id UUID NOT NULL REFERENCES members (id),
        expires_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS packages (
        id UUID PRIMARY KEY,
        sender_id UUID NOT NULL REFERENCES members (id),
        status VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS rides (
        id UUID PRIMARY KEY,
        carrier_id UUID NOT NULL REFERENCES members (id),
        status VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS matches (
        id UUID PRIMARY KEY,
        package_id UUID NOT NULL REFERENCES packages (id),
        ride_id UUID NOT NULL REFERENCES rides (id),
        status VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS payments (
        id UUID PRIMARY KEY,
        member_id UUID NOT NULL REFERENCES members (id),
        match_id UUID REFERENCES matches (id),
        status VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS contracts (
        id UUID PRIMARY KEY,
        merchant_id UUID REFERENCES members (id),
        carrier_id UUID REFERENCES members (id),
        status VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS services (
        id UUID PRIMARY KEY,
        provider_id UUID NOT NULL REFERENCES members (id),
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS bookings (
        id UUID PRIMARY KEY,
        customer_id UUID NOT NULL REFERENCES members (id),
        service_id UUID REFERENCES services (id),
        status VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS notifications (
        id UUID PRIMARY KEY,
        member_id UUID NOT NULL REFERENCES members (id),
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS messages (
        id UUID PRIMARY KEY,
        sender_id UUID NOT NULL REFERENCES members (id),
        recipient_id UUID NOT NULL REFERENCES members (id),
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS documents (
        id UUID PRIMARY KEY,
        member_id UUID NOT NULL REFERENCES members (id),
        document_type VARCHAR NOT NULL,
        related_entity_id UUID,
        filename VARCHAR NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS box_rentals (
        id UUID PRIMARY KEY,
        member_id UUID NOT NULL REFERENCES members (id),
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS subscriptions (
        id UUID PRIMARY KEY,
        member_id UUID NOT NULL REFERENCES members (id),
        status VARCHAR NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        merchant_id UUID NOT NULL REFERENCES members (id),
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
];

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>, config: &Config) -> Result<Self, Error> {
        // CREATE TABLE IF NOT EXISTS is not safe against concurrent starts
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(SCHEMA_LOCK))
            .await?;
        for statement in SCHEMA {
            tx.execute(*statement).await?;
        }
        tx.commit().await?;

        tokio::fs::create_dir_all(&config.documents_dir).await?;

        let logo = Logo::load(&std::env::current_dir()?).await.map(Arc::new);

        tracing::info!(documents_dir = ?config.documents_dir, "schema ready");

        Ok(Self {
            pool,
            authorizor: authorizor::new()?,
            session_keys: TokenKeys::from_secret(&config.auth.session_secret),
            api_keys: TokenKeys::from_secret(&config.auth.api_secret),
            session_ttl: config.auth.session_ttl,
            bcrypt_cost: config.auth.bcrypt_cost,
            documents_dir: config.documents_dir.clone(),
            logo,
        })
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(unauthorized_error())
    }

    fn keys(&self, audience: Audience) -> &TokenKeys {
        match audience {
            Audience::Admin => &self.session_keys,
            Audience::Public => &self.api_keys,
        }
    }
}

impl API for Engine {}
