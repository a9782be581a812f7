use super::helpers::decode_all;
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor};

use crate::{
    api::PaymentAPI,
    auth::{Platform, User},
    entities::{NewPayment, Payment, PaymentFilter},
    error::Error,
};

#[async_trait]
impl PaymentAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_payments(&self, user: User, filter: PaymentFilter) -> Result<Vec<Payment>, Error> {
        self.authorize(user, "manage_payments", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM payments
                     WHERE ($1::VARCHAR IS NULL OR status = $1)
                       AND ($2::UUID IS NULL OR member_id = $2)
                     ORDER BY created_at DESC",
                )
                .bind(filter.status.map(|s| s.name()))
                .bind(filter.member_id),
            )
            .await?;

        decode_all(rows)
    }

    /// Records a payment settled elsewhere; no money moves here.
    #[tracing::instrument(skip(self))]
    async fn record_payment(&self, user: User, params: NewPayment) -> Result<Payment, Error> {
        self.authorize(user, "manage_payments", Platform::default())?;

        let payment = Payment::new(params)?;

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO payments (id, member_id, match_id, status, created_at, data)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&payment.id)
            .bind(&payment.member_id)
            .bind(payment.match_id)
            .bind(payment.status.name())
            .bind(payment.created_at)
            .bind(Json(&payment)),
        )
        .await?;

        tracing::info!(payment_id = %payment.id, amount = payment.amount, "payment recorded");

        Ok(payment)
    }
}
