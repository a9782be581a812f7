use super::helpers::{decode_all, fetch_data};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor, Row};
use uuid::Uuid;

use crate::{
    api::MerchantAPI,
    auth::{Platform, User},
    entities::{Member, MerchantSummary, Product, ProductFilter, Role},
    error::{not_found_error, Error},
};

#[async_trait]
impl MerchantAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_merchants(&self, user: User) -> Result<Vec<MerchantSummary>, Error> {
        self.authorize(user, "manage_merchants", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT
                        m.data,
                        (SELECT COUNT(*) FROM products p WHERE p.merchant_id = m.id) AS product_count
                     FROM members m
                     WHERE m.role = $1
                     ORDER BY m.created_at DESC",
                )
                .bind(Role::Merchant.name()),
            )
            .await?;

        let mut merchants = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let Json(member): Json<Member> = row.try_get("data")?;
            let product_count: i64 = row.try_get("product_count")?;

            merchants.push(MerchantSummary {
                member,
                product_count,
            });
        }

        Ok(merchants)
    }

    #[tracing::instrument(skip(self))]
    async fn list_products(&self, user: User, filter: ProductFilter) -> Result<Vec<Product>, Error> {
        self.authorize(user, "manage_merchants", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM products
                     WHERE ($1::UUID IS NULL OR merchant_id = $1)
                     ORDER BY created_at DESC",
                )
                .bind(filter.merchant_id),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn find_product(&self, user: User, id: Uuid) -> Result<Product, Error> {
        self.authorize(user, "manage_merchants", Platform::default())?;

        fetch_data(&self.pool, "products", &id, "product").await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_product(&self, user: User, id: Uuid) -> Result<(), Error> {
        self.authorize(user, "manage_merchants", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let deleted = conn
            .execute(sqlx::query("DELETE FROM products WHERE id = $1").bind(&id))
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(not_found_error("product"));
        }

        tracing::info!(product_id = %id, "product deleted");

        Ok(())
    }
}
