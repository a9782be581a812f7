mod booking;
mod contract;
mod customer;
mod deletion;
mod document;
mod matches;
mod member;
mod notification;
mod package;
mod payment;
mod product;
mod ride;
mod subscription;

pub use booking::{Booking, Status as BookingStatus};
pub use contract::{Contract, ContractChanges, ContractFilter, NewContract, Status as ContractStatus};
pub use customer::CustomerData;
pub use deletion::{DeletedRows, DeletionReport, Relations};
pub use document::{Document, DocumentFilter, DocumentRequest, DocumentType};
pub use matches::{Match, MatchFilter, NewMatch, Status as MatchStatus};
pub use member::{Member, MemberChanges, MemberFilter, NewMember, Role, UserType};
pub use notification::{NewNotification, Notification};
pub use package::{NewPackage, Package, PackageFilter, Status as PackageStatus};
pub use payment::{NewPayment, Payment, PaymentFilter, Status as PaymentStatus};
pub use product::{MerchantSummary, Product, ProductFilter};
pub use ride::{NewRide, Ride, RideFilter, Status as RideStatus};
pub use subscription::{Plan, Subscription, SubscriptionChanges, SubscriptionFilter, Status as SubscriptionStatus};
