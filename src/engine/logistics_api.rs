use super::helpers::{decode_all, fetch_data};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor};
use uuid::Uuid;

use crate::{
    api::LogisticsAPI,
    auth::{Platform, User},
    entities::{NewPackage, NewRide, Package, PackageFilter, Ride, RideFilter},
    error::Error,
};

#[async_trait]
impl LogisticsAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_packages(&self, user: User, filter: PackageFilter) -> Result<Vec<Package>, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM packages
                     WHERE ($1::VARCHAR IS NULL OR status = $1)
                       AND ($2::UUID IS NULL OR sender_id = $2)
                     ORDER BY created_at DESC",
                )
                .bind(filter.status.map(|s| s.name()))
                .bind(filter.sender_id),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn find_package(&self, user: User, id: Uuid) -> Result<Package, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        fetch_data(&self.pool, "packages", &id, "package").await
    }

    #[tracing::instrument(skip(self))]
    async fn create_package(&self, user: User, params: NewPackage) -> Result<Package, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        let package = Package::new(params)?;

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO packages (id, sender_id, status, created_at, data)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&package.id)
            .bind(&package.sender_id)
            .bind(package.status.name())
            .bind(package.created_at)
            .bind(Json(&package)),
        )
        .await?;

        Ok(package)
    }

    #[tracing::instrument(skip(self))]
    async fn list_rides(&self, user: User, filter: RideFilter) -> Result<Vec<Ride>, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM rides
                     WHERE ($1::VARCHAR IS NULL OR status = $1)
                       AND ($2::UUID IS NULL OR carrier_id = $2)
                     ORDER BY created_at DESC",
                )
                .bind(filter.status.map(|s| s.name()))
                .bind(filter.carrier_id),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn find_ride(&self, user: User, id: Uuid) -> Result<Ride, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        fetch_data(&self.pool, "rides", &id, "ride").await
    }

    #[tracing::instrument(skip(self))]
    async fn create_ride(&self, user: User, params: NewRide) -> Result<Ride, Error> {
        self.authorize(user, "manage_logistics", Platform::default())?;

        let ride = Ride::new(params)?;

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO rides (id, carrier_id, status, created_at, data)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&ride.id)
            .bind(&ride.carrier_id)
            .bind(ride.status.name())
            .bind(ride.created_at)
            .bind(Json(&ride)),
        )
        .await?;

        Ok(ride)
    }
}
