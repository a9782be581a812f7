use super::helpers::decode_all;
use super::{Database, Engine};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::{pool::PoolConnection, Executor};

use crate::{
    api::AnalyticsAPI,
    auth::{Platform, User},
    entities::{Booking, Match, Member, Package, Payment, Ride},
    error::Error,
    stats::{self, Analytics, Collections, TimeRange},
};

async fn created_since<T: DeserializeOwned>(
    conn: &mut PoolConnection<Database>,
    table: &str,
    since: DateTime<Utc>,
) -> Result<Vec<T>, Error> {
    let query = format!("SELECT data FROM {} WHERE created_at >= $1", table);

    let rows = conn.fetch_all(sqlx::query(&query).bind(since)).await?;

    decode_all(rows)
}

#[async_trait]
impl AnalyticsAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn analytics(&self, user: User, range: TimeRange) -> Result<Analytics, Error> {
        self.authorize(user, "read_analytics", Platform::default())?;

        let until = Utc::now();
        let since = range.since(until);

        let mut conn = self.pool.acquire().await?;

        let members: Vec<Member> = created_since(&mut conn, "members", since).await?;
        let packages: Vec<Package> = created_since(&mut conn, "packages", since).await?;
        let rides: Vec<Ride> = created_since(&mut conn, "rides", since).await?;
        let matches: Vec<Match> = created_since(&mut conn, "matches", since).await?;
        let bookings: Vec<Booking> = created_since(&mut conn, "bookings", since).await?;
        let payments: Vec<Payment> = created_since(&mut conn, "payments", since).await?;

        let summary = stats::summarize(Collections {
            members: &members,
            packages: &packages,
            rides: &rides,
            matches: &matches,
            bookings: &bookings,
            payments: &payments,
        });

        Ok(Analytics {
            range,
            since,
            until,
            summary,
        })
    }
}
