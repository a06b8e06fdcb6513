//! Persistence layer.
//!
//! All reads and writes go through the [`Storage`] trait. Two backends
//! implement it: [`PgStorage`] over Postgres for deployments, and
//! [`MemoryStorage`] for local development and tests. Handlers hold an
//! `Arc<dyn Storage>` and never know which one they talk to.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use sterling_core::{
    DepositId, InquiryId, InquiryStatus, OrderId, ProductId, ProjectId, UserId,
};

use crate::models::{
    ChatEntry, Deposit, DepositPatch, Inquiry, InquiryPatch, NewChatEntry, NewDeposit,
    NewInquiry, NewOrder, NewOrderItem, NewProduct, NewProject, Order, OrderItem, OrderPatch,
    Product, ProductPatch, Project, ProjectPatch, UpsertUser, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be interpreted (e.g. an unknown status
    /// string). Indicates an out-of-band write or a bad migration.
    #[error("corrupt stored data: {0}")]
    DataCorruption(String),

    /// The referenced record does not exist.
    #[error("record not found")]
    NotFound,

    /// The write conflicts with existing data.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Result alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Listing filter for projects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectFilter {
    /// Only featured projects.
    pub featured: Option<bool>,
    /// Cap on the number of rows returned.
    pub limit: Option<i64>,
}

/// Listing filter for products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Only featured products.
    pub featured: Option<bool>,
    /// Case-insensitive substring match on name/description/category.
    pub search: Option<String>,
    /// Cap on the number of rows returned.
    pub limit: Option<i64>,
}

/// Listing filter for deposits.
#[derive(Debug, Clone, Default)]
pub struct DepositFilter {
    pub user_id: Option<UserId>,
    pub project_id: Option<ProjectId>,
}

/// Listing filter for inquiries.
#[derive(Debug, Clone, Default)]
pub struct InquiryFilter {
    pub user_id: Option<UserId>,
    pub status: Option<InquiryStatus>,
}

/// Listing filter for chat history.
#[derive(Debug, Clone, Default)]
pub struct ChatFilter {
    pub user_id: Option<UserId>,
    pub session_id: Option<String>,
}

/// Persistence operations for every entity.
///
/// Listings are newest-first. Update methods return the full post-update
/// record and fail with [`StorageError::NotFound`] when the id does not
/// exist.
#[async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;
    async fn upsert_user(&self, user: UpsertUser) -> Result<User>;
    async fn update_user_stripe_info(
        &self,
        id: &UserId,
        customer_id: String,
        subscription_id: Option<String>,
    ) -> Result<User>;

    // Projects
    async fn get_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>>;
    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>>;
    async fn create_project(&self, project: NewProject) -> Result<Project>;
    async fn update_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project>;
    async fn delete_project(&self, id: ProjectId) -> Result<()>;

    // Products
    async fn get_products(&self, filter: ProductFilter) -> Result<Vec<Product>>;
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>>;
    async fn search_products(&self, query: &str) -> Result<Vec<Product>>;
    async fn create_product(&self, product: NewProduct) -> Result<Product>;
    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product>;
    async fn delete_product(&self, id: ProductId) -> Result<()>;

    // Orders
    async fn get_orders(&self, user_id: Option<&UserId>) -> Result<Vec<Order>>;
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;
    async fn create_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<(Order, Vec<OrderItem>)>;
    async fn update_order(&self, id: OrderId, patch: OrderPatch) -> Result<Order>;
    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>>;

    // Deposits
    async fn get_deposits(&self, filter: DepositFilter) -> Result<Vec<Deposit>>;
    async fn get_deposit(&self, id: DepositId) -> Result<Option<Deposit>>;
    async fn create_deposit(&self, deposit: NewDeposit) -> Result<Deposit>;
    async fn update_deposit(&self, id: DepositId, patch: DepositPatch) -> Result<Deposit>;

    // Inquiries
    async fn get_inquiries(&self, filter: InquiryFilter) -> Result<Vec<Inquiry>>;
    async fn get_inquiry(&self, id: InquiryId) -> Result<Option<Inquiry>>;
    async fn create_inquiry(&self, inquiry: NewInquiry) -> Result<Inquiry>;
    async fn update_inquiry(&self, id: InquiryId, patch: InquiryPatch) -> Result<Inquiry>;

    // Chat history
    async fn get_chat_history(&self, filter: ChatFilter) -> Result<Vec<ChatEntry>>;
    async fn create_chat_entry(&self, entry: NewChatEntry) -> Result<ChatEntry>;
}

/// Create a Postgres connection pool.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}
