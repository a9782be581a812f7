use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// Business records that block a plain (non-forced) member deletion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Relations {
    pub packages: i64,
    pub rides: i64,
    pub payments: i64,
    pub contracts: i64,
    pub bookings: i64,
}

impl Relations {
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> i64 {
        self.packages + self.rides + self.payments + self.contracts + self.bookings
    }

    pub fn details(&self) -> Value {
        json!({
            "packages": self.packages,
            "rides": self.rides,
            "payments": self.payments,
            "contracts": self.contracts,
            "bookings": self.bookings,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DeletedRows {
    pub step: &'static str,
    pub rows: u64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub member_id: Uuid,
    pub forced: bool,
    pub deleted: Vec<DeletedRows>,
    pub files_removed: usize,
}

impl DeletionReport {
    pub fn new(member_id: Uuid, forced: bool) -> Self {
        Self {
            member_id,
            forced,
            deleted: Vec::new(),
            files_removed: 0,
        }
    }

    pub fn record(&mut self, step: &'static str, rows: u64) {
        self.deleted.push(DeletedRows { step, rows });
    }

    /// Rows removed by `step`, zero when the step did not run.
    pub fn rows(&self, step: &str) -> u64 {
        self.deleted
            .iter()
            .filter(|d| d.step == step)
            .map(|d| d.rows)
            .sum()
    }

    pub fn total(&self) -> u64 {
        self.deleted.iter().map(|d| d.rows).sum()
    }
}
