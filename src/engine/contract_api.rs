use super::helpers::{decode_all, fetch_contract_for_update, fetch_data, update_contract};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor, Row};
use uuid::Uuid;

use crate::{
    api::ContractAPI,
    auth::{Platform, User},
    entities::{Contract, ContractChanges, ContractFilter, DocumentType, Member, NewContract},
    error::{invalid_input_error, Error},
};

#[async_trait]
impl ContractAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_contracts(
        &self,
        user: User,
        filter: ContractFilter,
    ) -> Result<Vec<Contract>, Error> {
        self.authorize(user, "manage_contracts", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM contracts
                     WHERE ($1::VARCHAR IS NULL OR status = $1)
                       AND ($2::UUID IS NULL OR merchant_id = $2 OR carrier_id = $2)
                     ORDER BY created_at DESC",
                )
                .bind(filter.status.map(|s| s.name()))
                .bind(filter.member_id),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn find_contract(&self, user: User, id: Uuid) -> Result<Contract, Error> {
        self.authorize(user, "manage_contracts", Platform::default())?;

        fetch_data(&self.pool, "contracts", &id, "contract").await
    }

    #[tracing::instrument(skip(self))]
    async fn create_contract(&self, user: User, params: NewContract) -> Result<Contract, Error> {
        self.authorize(user, "manage_contracts", Platform::default())?;

        let contract = Contract::new(params)?;

        let mut tx = self.pool.begin().await?;

        let holder: Member = fetch_data(&mut tx, "members", &contract.holder_id(), "user").await?;

        if !holder.is_professional() {
            return Err(invalid_input_error(
                "contracts can only be issued to PROFESSIONAL users",
            ));
        }

        tx.execute(
            sqlx::query(
                "INSERT INTO contracts (id, merchant_id, carrier_id, status, created_at, data)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&contract.id)
            .bind(contract.merchant_id)
            .bind(contract.carrier_id)
            .bind(contract.status.name())
            .bind(contract.created_at)
            .bind(Json(&contract)),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(contract_id = %contract.id, holder_id = %holder.id, "contract created");

        Ok(contract)
    }

    #[tracing::instrument(skip(self))]
    async fn update_contract(
        &self,
        user: User,
        id: Uuid,
        changes: ContractChanges,
    ) -> Result<Contract, Error> {
        self.authorize(user, "manage_contracts", Platform::default())?;

        let mut tx = self.pool.begin().await?;

        let mut contract = fetch_contract_for_update(&mut tx, &id).await?;
        contract.apply(changes)?;
        update_contract(&mut tx, &contract).await?;

        tx.commit().await?;

        Ok(contract)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_contract(&self, user: User, id: Uuid) -> Result<(), Error> {
        self.authorize(user, "manage_contracts", Platform::default())?;

        let mut tx = self.pool.begin().await?;

        let contract = fetch_contract_for_update(&mut tx, &id).await?;
        contract.ensure_deletable()?;

        let rows = tx
            .fetch_all(
                sqlx::query(
                    "DELETE FROM documents
                     WHERE document_type = $1 AND related_entity_id = $2
                     RETURNING filename",
                )
                .bind(DocumentType::Contract.name())
                .bind(&id),
            )
            .await?;

        tx.execute(sqlx::query("DELETE FROM contracts WHERE id = $1").bind(&id))
            .await?;

        tx.commit().await?;

        tracing::info!(contract_id = %id, documents = rows.len(), "draft contract deleted");

        for row in rows {
            let filename: String = row.try_get("filename")?;
            self.remove_file(&filename).await;
        }

        Ok(())
    }
}
