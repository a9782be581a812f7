use super::Database;

use serde::de::DeserializeOwned;
use sqlx::{postgres::PgRow, types::Json, Executor, Row, Transaction};
use uuid::Uuid;

use crate::{
    entities::{Contract, Match, Member, Subscription},
    error::{not_found_error, Error},
};

/// Decodes the `data` column of every row.
pub fn decode_all<T: DeserializeOwned>(rows: Vec<PgRow>) -> Result<Vec<T>, Error> {
    rows.iter()
        .map(|row| -> Result<T, Error> {
            let Json(item): Json<T> = row.try_get("data")?;
            Ok(item)
        })
        .collect()
}

/// Plain read of one entity by primary key. `table` is always a literal.
pub async fn fetch_data<'c, E, T>(
    executor: E,
    table: &str,
    id: &Uuid,
    resource: &str,
) -> Result<T, Error>
where
    E: Executor<'c, Database = Database>,
    T: DeserializeOwned,
{
    let query = format!("SELECT data FROM {} WHERE id = $1", table);

    let Json(item): Json<T> = executor
        .fetch_optional(sqlx::query(&query).bind(id))
        .await?
        .ok_or_else(|| not_found_error(resource))?
        .try_get("data")?;

    Ok(item)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_member_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Member, Error> {
    let Json(member): Json<Member> = tx
        .fetch_optional(sqlx::query("SELECT data FROM members WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or_else(|| not_found_error("user"))?
        .try_get("data")?;

    Ok(member)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_match_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Match, Error> {
    let Json(m): Json<Match> = tx
        .fetch_optional(sqlx::query("SELECT data FROM matches WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or_else(|| not_found_error("match"))?
        .try_get("data")?;

    Ok(m)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_contract_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Contract, Error> {
    let Json(contract): Json<Contract> = tx
        .fetch_optional(
            sqlx::query("SELECT data FROM contracts WHERE id = $1 FOR UPDATE").bind(id),
        )
        .await?
        .ok_or_else(|| not_found_error("contract"))?
        .try_get("data")?;

    Ok(contract)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_subscription_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Subscription, Error> {
    let Json(subscription): Json<Subscription> = tx
        .fetch_optional(
            sqlx::query("SELECT data FROM subscriptions WHERE id = $1 FOR UPDATE").bind(id),
        )
        .await?
        .ok_or_else(|| not_found_error("subscription"))?
        .try_get("data")?;

    Ok(subscription)
}

#[tracing::instrument(skip(tx))]
pub async fn update_member(
    tx: &mut Transaction<'_, Database>,
    member: &Member,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE members SET email = $2, role = $3, data = $4 WHERE id = $1")
            .bind(&member.id)
            .bind(&member.email)
            .bind(member.role.name())
            .bind(Json(member)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_match(tx: &mut Transaction<'_, Database>, m: &Match) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE matches SET status = $2, data = $3 WHERE id = $1")
            .bind(&m.id)
            .bind(m.status.name())
            .bind(Json(m)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_contract(
    tx: &mut Transaction<'_, Database>,
    contract: &Contract,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE contracts SET status = $2, data = $3 WHERE id = $1")
            .bind(&contract.id)
            .bind(contract.status.name())
            .bind(Json(contract)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_subscription(
    tx: &mut Transaction<'_, Database>,
    subscription: &Subscription,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE subscriptions SET status = $2, data = $3 WHERE id = $1")
            .bind(&subscription.id)
            .bind(subscription.status.name())
            .bind(Json(subscription)),
    )
    .await?;

    Ok(())
}
