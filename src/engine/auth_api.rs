use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor, Row};
use uuid::Uuid;

use crate::{
    api::AuthAPI,
    auth::{password, Audience, Token, User},
    entities::{Member, Role},
    error::{unauthenticated_error, unexpected_error, Error},
};

#[async_trait]
impl AuthAPI for Engine {
    #[tracing::instrument(skip(self, password))]
    async fn login(
        &self,
        audience: Audience,
        email: String,
        password: String,
    ) -> Result<Token, Error> {
        let mut conn = self.pool.acquire().await?;

        let row = conn
            .fetch_optional(
                sqlx::query("SELECT password_hash, data FROM members WHERE email = $1")
                    .bind(email.trim().to_lowercase()),
            )
            .await?;

        let row = match row {
            Some(row) => row,
            None => {
                tracing::info!("login for unknown email");
                return Err(unauthenticated_error());
            }
        };

        let password_hash: String = row.try_get("password_hash")?;
        let Json(member): Json<Member> = row.try_get("data")?;

        // bcrypt blocks the thread
        let matches = tokio::task::spawn_blocking(move || password::verify(&password, &password_hash))
            .await
            .map_err(|_| unexpected_error())?;

        if !matches {
            tracing::info!(member_id = %member.id, "login with wrong password");
            return Err(unauthenticated_error());
        }

        if audience == Audience::Admin && member.role != Role::Admin {
            tracing::info!(member_id = %member.id, "non-admin login to the dashboard");
            return Err(unauthenticated_error());
        }

        let session_id = Uuid::new_v4();
        let token = self
            .keys(audience)
            .issue(member.id, member.role, session_id, self.session_ttl)?;

        conn.execute(
            sqlx::query("INSERT INTO sessions (id, member_id, expires_at) VALUES ($1, $2, $3)")
                .bind(&session_id)
                .bind(&member.id)
                .bind(token.expires_at),
        )
        .await?;

        tracing::info!(member_id = %member.id, %session_id, "session opened");

        Ok(token)
    }

    #[tracing::instrument(skip(self, token))]
    async fn authenticate(&self, audience: Audience, token: &str) -> Result<User, Error> {
        let claims = self.keys(audience).verify(token)?;

        let mut conn = self.pool.acquire().await?;

        // the role is re-read so that demotions apply to open sessions
        let row = conn
            .fetch_optional(
                sqlx::query(
                    "SELECT m.role FROM sessions s JOIN members m ON m.id = s.member_id
                     WHERE s.id = $1 AND s.member_id = $2 AND s.expires_at > now()",
                )
                .bind(&claims.sid)
                .bind(&claims.sub),
            )
            .await?
            .ok_or_else(unauthenticated_error)?;

        let role: String = row.try_get("role")?;

        Ok(User::new(claims.sub, role.parse::<Role>()?))
    }
}
