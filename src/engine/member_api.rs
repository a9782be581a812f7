use super::deletion;
use super::helpers::{decode_all, fetch_data, fetch_member_for_update, update_member};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor};
use uuid::Uuid;

use crate::{
    api::MemberAPI,
    auth::{password, Platform, User},
    entities::{
        DeletionReport, Member, MemberChanges, MemberFilter, NewMember, NewNotification,
        Notification,
    },
    error::{conflict_error, unexpected_error, Error},
};

#[async_trait]
impl MemberAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_members(&self, user: User, filter: MemberFilter) -> Result<Vec<Member>, Error> {
        self.authorize(user, "manage_members", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM members
                     WHERE ($1::VARCHAR IS NULL OR role = $1)
                     ORDER BY created_at DESC",
                )
                .bind(filter.role.map(|r| r.name())),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn find_member(&self, user: User, id: Uuid) -> Result<Member, Error> {
        self.authorize(user, "manage_members", Platform::default())?;

        fetch_data(&self.pool, "members", &id, "user").await
    }

    #[tracing::instrument(skip(self))]
    async fn create_member(&self, user: User, params: NewMember) -> Result<Member, Error> {
        self.authorize(user, "manage_members", Platform::default())?;

        params.validate()?;

        let member = Member::new(&params);

        let cost = self.bcrypt_cost;
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash(&params.password, cost))
                .await
                .map_err(|_| unexpected_error())??;

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO members (id, email, role, password_hash, created_at, data)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&member.id)
            .bind(&member.email)
            .bind(member.role.name())
            .bind(&password_hash)
            .bind(member.created_at)
            .bind(Json(&member)),
        )
        .await?;

        tracing::info!(member_id = %member.id, role = member.role.name(), "member created");

        Ok(member)
    }

    #[tracing::instrument(skip(self))]
    async fn update_member(
        &self,
        user: User,
        id: Uuid,
        changes: MemberChanges,
    ) -> Result<Member, Error> {
        self.authorize(user, "manage_members", Platform::default())?;

        let mut tx = self.pool.begin().await?;

        let mut member = fetch_member_for_update(&mut tx, &id).await?;
        member.apply(changes)?;
        update_member(&mut tx, &member).await?;

        tx.commit().await?;

        Ok(member)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_member(
        &self,
        user: User,
        id: Uuid,
        force: bool,
    ) -> Result<DeletionReport, Error> {
        self.authorize(user, "manage_members", Platform::default())?;

        let mut tx = self.pool.begin().await?;

        fetch_member_for_update(&mut tx, &id).await?;

        let relations = deletion::count_relations(&mut tx, &id).await?;

        if !relations.is_empty() && !force {
            tracing::info!(?relations, "member still has relations, refusing to delete");
            return Err(conflict_error(
                "Cannot delete user with existing relations. Use force=true to delete anyway.",
                relations.details(),
            ));
        }

        let files = deletion::document_files(&mut tx, &id).await?;

        let mut report = DeletionReport::new(id, force);
        deletion::run(&mut tx, &id, &mut report).await?;

        tx.commit().await?;

        tracing::info!(rows = report.total(), forced = force, "member deleted");

        for filename in &files {
            if self.remove_file(filename).await {
                report.files_removed += 1;
            }
        }

        Ok(report)
    }

    #[tracing::instrument(skip(self))]
    async fn notify_member(
        &self,
        user: User,
        id: Uuid,
        params: NewNotification,
    ) -> Result<Notification, Error> {
        self.authorize(user, "manage_members", Platform::default())?;

        let notification = Notification::new(id, params)?;

        let mut conn = self.pool.acquire().await?;

        // existence is left to the foreign key
        conn.execute(
            sqlx::query(
                "INSERT INTO notifications (id, member_id, created_at, data) VALUES ($1, $2, $3, $4)",
            )
            .bind(&notification.id)
            .bind(&notification.member_id)
            .bind(notification.created_at)
            .bind(Json(&notification)),
        )
        .await?;

        Ok(notification)
    }
}
