use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::{Audience, Token, User};
use crate::entities::{
    Contract, ContractChanges, ContractFilter, CustomerData, DeletionReport, Document,
    DocumentFilter, DocumentRequest, Match, MatchFilter, Member, MemberChanges, MemberFilter,
    MerchantSummary, NewContract, NewMatch, NewMember, NewNotification, NewPackage, NewPayment,
    NewRide, Notification, Package, PackageFilter, Payment, PaymentFilter, Plan, Product,
    ProductFilter, Ride, RideFilter, Subscription, SubscriptionChanges, SubscriptionFilter,
};
use crate::error::Error;
use crate::stats::{Analytics, TimeRange};

#[async_trait]
pub trait AuthAPI {
    async fn login(&self, audience: Audience, email: String, password: String)
        -> Result<Token, Error>;

    /// Resolves a bearer token into the principal it was issued to.
    async fn authenticate(&self, audience: Audience, token: &str) -> Result<User, Error>;
}

#[async_trait]
pub trait MemberAPI {
    async fn list_members(&self, user: User, filter: MemberFilter) -> Result<Vec<Member>, Error>;

    async fn find_member(&self, user: User, id: Uuid) -> Result<Member, Error>;

    async fn create_member(&self, user: User, params: NewMember) -> Result<Member, Error>;

    async fn update_member(
        &self,
        user: User,
        id: Uuid,
        changes: MemberChanges,
    ) -> Result<Member, Error>;

    /// Without `force`, refuses while the member still owns business records.
    async fn delete_member(&self, user: User, id: Uuid, force: bool)
        -> Result<DeletionReport, Error>;

    async fn notify_member(
        &self,
        user: User,
        id: Uuid,
        params: NewNotification,
    ) -> Result<Notification, Error>;
}

#[async_trait]
pub trait ContractAPI {
    async fn list_contracts(&self, user: User, filter: ContractFilter)
        -> Result<Vec<Contract>, Error>;

    async fn find_contract(&self, user: User, id: Uuid) -> Result<Contract, Error>;

    async fn create_contract(&self, user: User, params: NewContract) -> Result<Contract, Error>;

    async fn update_contract(
        &self,
        user: User,
        id: Uuid,
        changes: ContractChanges,
    ) -> Result<Contract, Error>;

    async fn delete_contract(&self, user: User, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait DocumentAPI {
    async fn list_documents(&self, user: User, filter: DocumentFilter)
        -> Result<Vec<Document>, Error>;

    async fn generate_document(&self, user: User, request: DocumentRequest)
        -> Result<Document, Error>;

    async fn delete_document(&self, user: User, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait MatchAPI {
    async fn list_matches(&self, user: User, filter: MatchFilter) -> Result<Vec<Match>, Error>;

    async fn find_match(&self, user: User, id: Uuid) -> Result<Match, Error>;

    async fn create_match(&self, user: User, params: NewMatch) -> Result<Match, Error>;

    async fn update_match_status(&self, user: User, id: Uuid, status: String)
        -> Result<Match, Error>;
}

#[async_trait]
pub trait LogisticsAPI {
    async fn list_packages(&self, user: User, filter: PackageFilter)
        -> Result<Vec<Package>, Error>;

    async fn find_package(&self, user: User, id: Uuid) -> Result<Package, Error>;

    async fn create_package(&self, user: User, params: NewPackage) -> Result<Package, Error>;

    async fn list_rides(&self, user: User, filter: RideFilter) -> Result<Vec<Ride>, Error>;

    async fn find_ride(&self, user: User, id: Uuid) -> Result<Ride, Error>;

    async fn create_ride(&self, user: User, params: NewRide) -> Result<Ride, Error>;
}

#[async_trait]
pub trait PaymentAPI {
    async fn list_payments(&self, user: User, filter: PaymentFilter)
        -> Result<Vec<Payment>, Error>;

    async fn record_payment(&self, user: User, params: NewPayment) -> Result<Payment, Error>;
}

#[async_trait]
pub trait MerchantAPI {
    async fn list_merchants(&self, user: User) -> Result<Vec<MerchantSummary>, Error>;

    async fn list_products(&self, user: User, filter: ProductFilter)
        -> Result<Vec<Product>, Error>;

    async fn find_product(&self, user: User, id: Uuid) -> Result<Product, Error>;

    async fn delete_product(&self, user: User, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait SubscriptionAPI {
    async fn list_subscriptions(
        &self,
        user: User,
        filter: SubscriptionFilter,
    ) -> Result<Vec<Subscription>, Error>;

    async fn create_subscription(
        &self,
        user: User,
        member_id: Uuid,
        plan: Plan,
    ) -> Result<Subscription, Error>;

    async fn update_subscription(
        &self,
        user: User,
        id: Uuid,
        changes: SubscriptionChanges,
    ) -> Result<Subscription, Error>;
}

#[async_trait]
pub trait AnalyticsAPI {
    async fn analytics(&self, user: User, range: TimeRange) -> Result<Analytics, Error>;
}

#[async_trait]
pub trait CustomerAPI {
    async fn customer_data(&self, user: User) -> Result<CustomerData, Error>;
}

pub trait API:
    AuthAPI
    + MemberAPI
    + ContractAPI
    + DocumentAPI
    + MatchAPI
    + LogisticsAPI
    + PaymentAPI
    + MerchantAPI
    + SubscriptionAPI
    + AnalyticsAPI
    + CustomerAPI
{
}

pub type DynAPI = Arc<dyn API + Send + Sync>;
