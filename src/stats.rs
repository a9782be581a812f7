//! Dashboard aggregates. Everything here is pure; callers fetch the rows.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Booking, Match, MatchStatus, Member, Package, Payment, Ride};

/// Reporting window for the analytics dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl TimeRange {
    pub fn duration(&self) -> Duration {
        match self {
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
            Self::Quarter => Duration::days(90),
            Self::Year => Duration::days(365),
        }
    }

    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub range: TimeRange,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: Summary,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub new_members: usize,
    pub members_by_role: BTreeMap<String, usize>,
    pub packages: usize,
    pub average_package_weight_kg: f64,
    pub rides: usize,
    pub matches: usize,
    pub matches_by_status: BTreeMap<String, usize>,
    /// Share of matches that reached CONFIRMED, in percent.
    pub match_confirmation_rate: f64,
    pub bookings: usize,
    pub payments: usize,
    pub completed_payments: usize,
    pub revenue: f64,
    /// Share of payments that completed, in percent.
    pub payment_success_rate: f64,
}

pub struct Collections<'a> {
    pub members: &'a [Member],
    pub packages: &'a [Package],
    pub rides: &'a [Ride],
    pub matches: &'a [Match],
    pub bookings: &'a [Booking],
    pub payments: &'a [Payment],
}

/// `part / whole` in percent, rounded to two decimals. Zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }

    round2(part as f64 * 100.0 / whole as f64)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn revenue(payments: &[Payment]) -> f64 {
    round2(
        payments
            .iter()
            .filter(|p| p.is_completed())
            .map(|p| p.amount)
            .sum(),
    )
}

pub fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        return 0.0;
    }

    round2(sum / count as f64)
}

pub fn count_by<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();

    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }

    counts
}

pub fn summarize(c: Collections<'_>) -> Summary {
    let confirmed = c
        .matches
        .iter()
        .filter(|m| m.status == MatchStatus::Confirmed)
        .count();
    let completed_payments = c.payments.iter().filter(|p| p.is_completed()).count();

    Summary {
        new_members: c.members.len(),
        members_by_role: count_by(c.members, |m| m.role.name().to_string()),
        packages: c.packages.len(),
        average_package_weight_kg: average(c.packages.iter().map(|p| p.weight_kg)),
        rides: c.rides.len(),
        matches: c.matches.len(),
        matches_by_status: count_by(c.matches, |m| m.status.name().to_string()),
        match_confirmation_rate: percentage(confirmed, c.matches.len()),
        bookings: c.bookings.len(),
        payments: c.payments.len(),
        completed_payments,
        revenue: revenue(c.payments),
        payment_success_rate: percentage(completed_payments, c.payments.len()),
    }
}
