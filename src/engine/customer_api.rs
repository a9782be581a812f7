use super::helpers::{decode_all, fetch_data};
use super::Engine;

use async_trait::async_trait;
use sqlx::Executor;

use crate::{
    api::CustomerAPI,
    auth::{Platform, User},
    entities::{CustomerData, Member},
    error::Error,
};

#[async_trait]
impl CustomerAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn customer_data(&self, user: User) -> Result<CustomerData, Error> {
        self.authorize(user.clone(), "read_own_data", Platform::default())?;

        let profile: Member = fetch_data(&self.pool, "members", &user.id, "user").await?;

        let mut conn = self.pool.acquire().await?;

        let packages = conn
            .fetch_all(
                sqlx::query("SELECT data FROM packages WHERE sender_id = $1 ORDER BY created_at DESC")
                    .bind(&user.id),
            )
            .await?;

        let bookings = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM bookings WHERE customer_id = $1 ORDER BY created_at DESC",
                )
                .bind(&user.id),
            )
            .await?;

        let payments = conn
            .fetch_all(
                sqlx::query("SELECT data FROM payments WHERE member_id = $1 ORDER BY created_at DESC")
                    .bind(&user.id),
            )
            .await?;

        let notifications = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM notifications WHERE member_id = $1 ORDER BY created_at DESC",
                )
                .bind(&user.id),
            )
            .await?;

        Ok(CustomerData {
            profile,
            packages: decode_all(packages)?,
            bookings: decode_all(bookings)?,
            payments: decode_all(payments)?,
            notifications: decode_all(notifications)?,
        })
    }
}
