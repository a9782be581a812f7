use super::helpers::{decode_all, fetch_subscription_for_update, update_subscription};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor};
use uuid::Uuid;

use crate::{
    api::SubscriptionAPI,
    auth::{Platform, User},
    entities::{Plan, Subscription, SubscriptionChanges, SubscriptionFilter},
    error::Error,
};

#[async_trait]
impl SubscriptionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_subscriptions(
        &self,
        user: User,
        filter: SubscriptionFilter,
    ) -> Result<Vec<Subscription>, Error> {
        self.authorize(user, "manage_subscriptions", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM subscriptions
                     WHERE ($1::VARCHAR IS NULL OR status = $1)
                       AND ($2::UUID IS NULL OR member_id = $2)",
                )
                .bind(filter.status.map(|s| s.name()))
                .bind(filter.member_id),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn create_subscription(
        &self,
        user: User,
        member_id: Uuid,
        plan: Plan,
    ) -> Result<Subscription, Error> {
        self.authorize(user, "manage_subscriptions", Platform::default())?;

        let subscription = Subscription::new(member_id, plan);

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO subscriptions (id, member_id, status, data) VALUES ($1, $2, $3, $4)",
            )
            .bind(&subscription.id)
            .bind(&subscription.member_id)
            .bind(subscription.status.name())
            .bind(Json(&subscription)),
        )
        .await?;

        Ok(subscription)
    }

    #[tracing::instrument(skip(self))]
    async fn update_subscription(
        &self,
        user: User,
        id: Uuid,
        changes: SubscriptionChanges,
    ) -> Result<Subscription, Error> {
        self.authorize(user, "manage_subscriptions", Platform::default())?;

        let mut tx = self.pool.begin().await?;

        let mut subscription = fetch_subscription_for_update(&mut tx, &id).await?;
        subscription.apply(changes)?;
        update_subscription(&mut tx, &subscription).await?;

        tx.commit().await?;

        tracing::info!(subscription_id = %id, status = subscription.status.name(), "subscription updated");

        Ok(subscription)
    }
}
