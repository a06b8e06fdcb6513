//! Domain entities and their client-supplied shapes.
//!
//! Every entity has up to three shapes:
//!
//! - the full record (server-assigned id and timestamps included),
//! - a `New*` insert shape (the subset a client may supply at creation),
//! - a `*Patch` partial-update shape (every field optional; only supplied
//!   fields are merged onto the stored record).
//!
//! JSON uses camelCase field names and serializes decimals as strings,
//! matching the wire format the storefront frontend already consumes.
//! Insert shapes carry their own `validate()`; the UI performs the same
//! checks but is not a trust boundary.

pub mod chat;
pub mod deposit;
pub mod inquiry;
pub mod order;
pub mod product;
pub mod project;
pub mod user;

pub use chat::{ChatEntry, NewChatEntry};
pub use deposit::{Deposit, DepositPatch, NewDeposit};
pub use inquiry::{Inquiry, InquiryPatch, NewInquiry};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderPatch};
pub use product::{NewProduct, Product, ProductPatch};
pub use project::{NewProject, Project, ProjectPatch};
pub use user::{UpsertUser, User};
