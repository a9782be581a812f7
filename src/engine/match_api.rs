use super::helpers::{decode_all, fetch_data, fetch_match_for_update, update_match};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor};
use uuid::Uuid;

use crate::{
    api::MatchAPI,
    auth::{Platform, User},
    entities::{Match, MatchFilter, MatchStatus, NewMatch, Package, Ride},
    error::Error,
};

#[async_trait]
impl MatchAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_matches(&self, user: User, filter: MatchFilter) -> Result<Vec<Match>, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM matches
                     WHERE ($1::VARCHAR IS NULL OR status = $1)
                       AND ($2::UUID IS NULL OR package_id = $2)
                       AND ($3::UUID IS NULL OR ride_id = $3)
                     ORDER BY created_at DESC",
                )
                .bind(filter.status.map(|s| s.name()))
                .bind(filter.package_id)
                .bind(filter.ride_id),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn find_match(&self, user: User, id: Uuid) -> Result<Match, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        fetch_data(&self.pool, "matches", &id, "match").await
    }

    #[tracing::instrument(skip(self))]
    async fn create_match(&self, user: User, params: NewMatch) -> Result<Match, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        let m = Match::new(&params)?;

        let mut tx = self.pool.begin().await?;

        let _: Package = fetch_data(&mut tx, "packages", &m.package_id, "package").await?;
        let _: Ride = fetch_data(&mut tx, "rides", &m.ride_id, "ride").await?;

        tx.execute(
            sqlx::query(
                "INSERT INTO matches (id, package_id, ride_id, status, created_at, data)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&m.id)
            .bind(&m.package_id)
            .bind(&m.ride_id)
            .bind(m.status.name())
            .bind(m.created_at)
            .bind(Json(&m)),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(match_id = %m.id, "match proposed");

        Ok(m)
    }

    #[tracing::instrument(skip(self))]
    async fn update_match_status(
        &self,
        user: User,
        id: Uuid,
        status: String,
    ) -> Result<Match, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        let next: MatchStatus = status.parse()?;

        // the row lock orders concurrent updates; the loser sees the new status
        let mut tx = self.pool.begin().await?;

        let mut m = fetch_match_for_update(&mut tx, &id).await?;
        let previous = m.status;

        m.transition(next)?;
        update_match(&mut tx, &m).await?;

        tx.commit().await?;

        tracing::info!(match_id = %m.id, from = %previous, to = %next, "match status changed");

        Ok(m)
    }
}
