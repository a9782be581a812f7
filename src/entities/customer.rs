use serde::Serialize;

use super::{Booking, Member, Notification, Package, Payment};

/// Everything a customer sees about their own account.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub profile: Member,
    pub packages: Vec<Package>,
    pub bookings: Vec<Booking>,
    pub payments: Vec<Payment>,
    pub notifications: Vec<Notification>,
}
