//! Shared type definitions.
//!
//! - [`id`] - Type-safe ID newtypes for every entity
//! - [`email`] - Validated email address wrapper
//! - [`money`] - Exact decimal currency conversion helpers
//! - [`status`] - Closed status enums for orders, deposits, and inquiries

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{
    ChatEntryId, DepositId, InquiryId, OrderId, OrderItemId, ProductId, ProjectId, UserId,
};
pub use money::{from_minor_units, percentage_of, to_minor_units};
pub use status::{DepositStatus, InquiryStatus, OrderStatus};
