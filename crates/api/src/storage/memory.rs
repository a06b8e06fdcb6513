//! In-memory storage backend.
//!
//! Used when no `DATABASE_URL` is configured (local development) and by the
//! integration tests. Ids are handed out from per-entity monotonic counters,
//! mirroring the serial columns of the Postgres backend, and listings come
//! back newest-first.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use sterling_core::{
    ChatEntryId, DepositId, DepositStatus, InquiryId, InquiryStatus, OrderId, OrderItemId,
    OrderStatus, ProductId, ProjectId, UserId,
};

use crate::models::{
    ChatEntry, Deposit, DepositPatch, Inquiry, InquiryPatch, NewChatEntry, NewDeposit,
    NewInquiry, NewOrder, NewOrderItem, NewProduct, NewProject, Order, OrderItem, OrderPatch,
    Product, ProductPatch, Project, ProjectPatch, UpsertUser, User,
};

use super::{
    ChatFilter, DepositFilter, InquiryFilter, ProductFilter, ProjectFilter, Result, Storage,
    StorageError,
};

/// Case-insensitive substring match over name, description, and category.
/// `needle` must already be lowercased.
fn matches_search(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || product
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(needle))
}

#[derive(Debug, Default)]
struct Counters {
    project: i32,
    product: i32,
    order: i32,
    order_item: i32,
    deposit: i32,
    inquiry: i32,
    chat: i32,
}

impl Counters {
    fn next(slot: &mut i32) -> i32 {
        *slot += 1;
        *slot
    }
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<UserId, User>,
    projects: BTreeMap<i32, Project>,
    products: BTreeMap<i32, Product>,
    orders: BTreeMap<i32, Order>,
    order_items: BTreeMap<i32, OrderItem>,
    deposits: BTreeMap<i32, Deposit>,
    inquiries: BTreeMap<i32, Inquiry>,
    chat_entries: BTreeMap<i32, ChatEntry>,
    counters: Counters,
}

/// In-memory [`Storage`] backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the demo portfolio and catalog the
    /// storefront expects on a fresh install.
    #[must_use]
    pub fn with_seed_data() -> Self {
        let store = Self::new();
        {
            let mut inner = store.write();
            let now = Utc::now();

            for (title, category, status, budget, location) in [
                (
                    "Modern Office Building",
                    "commercial",
                    "completed",
                    Decimal::new(2_500_000, 0),
                    "Kampala",
                ),
                (
                    "Residential Complex",
                    "residential",
                    "in_progress",
                    Decimal::new(1_800_000, 0),
                    "Entebbe",
                ),
            ] {
                let id = Counters::next(&mut inner.counters.project);
                inner.projects.insert(
                    id,
                    Project {
                        id: ProjectId::new(id),
                        title: title.to_owned(),
                        description: Some(format!("{title} delivered by Sterling Contractors.")),
                        category: Some(category.to_owned()),
                        status: status.to_owned(),
                        budget: Some(budget),
                        deposit_amount: None,
                        client_name: None,
                        client_email: None,
                        client_phone: None,
                        location: Some(location.to_owned()),
                        start_date: None,
                        end_date: None,
                        image_url: None,
                        featured: true,
                        user_id: None,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }

            for (name, category, price, stock, rating) in [
                (
                    "Professional Hammer Set",
                    "tools",
                    Decimal::new(8999, 2),
                    50,
                    Decimal::new(480, 2),
                ),
                (
                    "Premium Drill Kit",
                    "tools",
                    Decimal::new(24999, 2),
                    25,
                    Decimal::new(490, 2),
                ),
            ] {
                let id = Counters::next(&mut inner.counters.product);
                inner.products.insert(
                    id,
                    Product {
                        id: ProductId::new(id),
                        name: name.to_owned(),
                        description: Some(format!("{name} for professional site work.")),
                        category: Some(category.to_owned()),
                        price,
                        stock_quantity: stock,
                        image_url: None,
                        featured: true,
                        rating,
                        specifications: None,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        store
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        // A poisoned lock only means another request panicked mid-write;
        // the data itself is still usable.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.read().users.get(id).cloned())
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User> {
        let mut inner = self.write();
        let now = Utc::now();
        let record = inner
            .users
            .entry(user.id.clone())
            .and_modify(|existing| {
                existing.email.clone_from(&user.email);
                existing.first_name.clone_from(&user.first_name);
                existing.last_name.clone_from(&user.last_name);
                existing.profile_image_url.clone_from(&user.profile_image_url);
                existing.updated_at = now;
            })
            .or_insert_with(|| User {
                id: user.id.clone(),
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                profile_image_url: user.profile_image_url.clone(),
                stripe_customer_id: None,
                stripe_subscription_id: None,
                created_at: now,
                updated_at: now,
            });
        Ok(record.clone())
    }

    async fn update_user_stripe_info(
        &self,
        id: &UserId,
        customer_id: String,
        subscription_id: Option<String>,
    ) -> Result<User> {
        let mut inner = self.write();
        let user = inner.users.get_mut(id).ok_or(StorageError::NotFound)?;
        user.stripe_customer_id = Some(customer_id);
        user.stripe_subscription_id = subscription_id;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn get_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>> {
        let inner = self.read();
        let mut projects: Vec<Project> = inner
            .projects
            .values()
            .rev()
            .filter(|p| filter.featured.is_none_or(|f| p.featured == f))
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            projects.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(projects)
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        Ok(self.read().projects.get(&id.as_i32()).cloned())
    }

    async fn create_project(&self, project: NewProject) -> Result<Project> {
        let mut inner = self.write();
        let id = Counters::next(&mut inner.counters.project);
        let now = Utc::now();
        let record = Project {
            id: ProjectId::new(id),
            title: project.title,
            description: project.description,
            category: project.category,
            status: project.status,
            budget: project.budget,
            deposit_amount: project.deposit_amount,
            client_name: project.client_name,
            client_email: project.client_email,
            client_phone: project.client_phone,
            location: project.location,
            start_date: project.start_date,
            end_date: project.end_date,
            image_url: project.image_url,
            featured: project.featured,
            user_id: project.user_id,
            created_at: now,
            updated_at: now,
        };
        inner.projects.insert(id, record.clone());
        Ok(record)
    }

    async fn update_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project> {
        let mut inner = self.write();
        let project = inner
            .projects
            .get_mut(&id.as_i32())
            .ok_or(StorageError::NotFound)?;
        patch.apply_to(project, Utc::now());
        Ok(project.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        let mut inner = self.write();
        inner
            .projects
            .remove(&id.as_i32())
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn get_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let inner = self.read();
        let mut products: Vec<Product> = inner
            .products
            .values()
            .rev()
            .filter(|p| {
                filter
                    .category
                    .as_deref()
                    .is_none_or(|c| p.category.as_deref() == Some(c))
            })
            .filter(|p| filter.featured.is_none_or(|f| p.featured == f))
            .filter(|p| needle.as_deref().is_none_or(|n| matches_search(p, n)))
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            products.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.read().products.get(&id.as_i32()).cloned())
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        let needle = query.to_lowercase();
        let inner = self.read();
        Ok(inner
            .products
            .values()
            .rev()
            .filter(|p| matches_search(p, &needle))
            .cloned()
            .collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let mut inner = self.write();
        let id = Counters::next(&mut inner.counters.product);
        let now = Utc::now();
        let record = Product {
            id: ProductId::new(id),
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price,
            stock_quantity: product.stock_quantity,
            image_url: product.image_url,
            featured: product.featured,
            rating: product.rating,
            specifications: product.specifications,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(id, record.clone());
        Ok(record)
    }

    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
        let mut inner = self.write();
        let product = inner
            .products
            .get_mut(&id.as_i32())
            .ok_or(StorageError::NotFound)?;
        patch.apply_to(product, Utc::now());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        let mut inner = self.write();
        inner
            .products
            .remove(&id.as_i32())
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn get_orders(&self, user_id: Option<&UserId>) -> Result<Vec<Order>> {
        let inner = self.read();
        Ok(inner
            .orders
            .values()
            .rev()
            .filter(|o| user_id.is_none_or(|uid| o.user_id.as_ref() == Some(uid)))
            .cloned()
            .collect())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.read().orders.get(&id.as_i32()).cloned())
    }

    async fn create_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<(Order, Vec<OrderItem>)> {
        let mut inner = self.write();
        let now = Utc::now();
        let order_id = Counters::next(&mut inner.counters.order);
        let record = Order {
            id: OrderId::new(order_id),
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            payment_intent_id: order.payment_intent_id,
            stripe_session_id: order.stripe_session_id,
            created_at: now,
            updated_at: now,
        };
        inner.orders.insert(order_id, record.clone());

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let item_id = Counters::next(&mut inner.counters.order_item);
            let line = OrderItem {
                id: OrderItemId::new(item_id),
                order_id: record.id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
                created_at: now,
            };
            inner.order_items.insert(item_id, line.clone());
            lines.push(line);
        }
        Ok((record, lines))
    }

    async fn update_order(&self, id: OrderId, patch: OrderPatch) -> Result<Order> {
        let mut inner = self.write();
        let order = inner
            .orders
            .get_mut(&id.as_i32())
            .ok_or(StorageError::NotFound)?;
        patch.apply_to(order, Utc::now());
        Ok(order.clone())
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>> {
        let inner = self.read();
        Ok(inner
            .order_items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn get_deposits(&self, filter: DepositFilter) -> Result<Vec<Deposit>> {
        let inner = self.read();
        Ok(inner
            .deposits
            .values()
            .rev()
            .filter(|d| {
                filter
                    .user_id
                    .as_ref()
                    .is_none_or(|uid| d.user_id.as_ref() == Some(uid))
            })
            .filter(|d| {
                filter
                    .project_id
                    .is_none_or(|pid| d.project_id == Some(pid))
            })
            .cloned()
            .collect())
    }

    async fn get_deposit(&self, id: DepositId) -> Result<Option<Deposit>> {
        Ok(self.read().deposits.get(&id.as_i32()).cloned())
    }

    async fn create_deposit(&self, deposit: NewDeposit) -> Result<Deposit> {
        let mut inner = self.write();
        let id = Counters::next(&mut inner.counters.deposit);
        let now = Utc::now();
        let record = Deposit {
            id: DepositId::new(id),
            project_id: deposit.project_id,
            user_id: deposit.user_id,
            amount: deposit.amount,
            status: deposit.status,
            payment_method: deposit.payment_method,
            payment_intent_id: deposit.payment_intent_id,
            mobile_money_reference: deposit.mobile_money_reference,
            created_at: now,
            updated_at: now,
        };
        inner.deposits.insert(id, record.clone());
        Ok(record)
    }

    async fn update_deposit(&self, id: DepositId, patch: DepositPatch) -> Result<Deposit> {
        let mut inner = self.write();
        let deposit = inner
            .deposits
            .get_mut(&id.as_i32())
            .ok_or(StorageError::NotFound)?;
        patch.apply_to(deposit, Utc::now());
        Ok(deposit.clone())
    }

    async fn get_inquiries(&self, filter: InquiryFilter) -> Result<Vec<Inquiry>> {
        let inner = self.read();
        Ok(inner
            .inquiries
            .values()
            .rev()
            .filter(|i| {
                filter
                    .user_id
                    .as_ref()
                    .is_none_or(|uid| i.user_id.as_ref() == Some(uid))
            })
            .filter(|i| filter.status.is_none_or(|s| i.status == s))
            .cloned()
            .collect())
    }

    async fn get_inquiry(&self, id: InquiryId) -> Result<Option<Inquiry>> {
        Ok(self.read().inquiries.get(&id.as_i32()).cloned())
    }

    async fn create_inquiry(&self, inquiry: NewInquiry) -> Result<Inquiry> {
        let mut inner = self.write();
        let id = Counters::next(&mut inner.counters.inquiry);
        let now = Utc::now();
        let record = Inquiry {
            id: InquiryId::new(id),
            first_name: inquiry.first_name,
            last_name: inquiry.last_name,
            email: inquiry.email,
            phone: Some(inquiry.phone),
            project_type: Some(inquiry.project_type),
            message: inquiry.message,
            status: InquiryStatus::New,
            user_id: inquiry.user_id,
            created_at: now,
            updated_at: now,
        };
        inner.inquiries.insert(id, record.clone());
        Ok(record)
    }

    async fn update_inquiry(&self, id: InquiryId, patch: InquiryPatch) -> Result<Inquiry> {
        let mut inner = self.write();
        let inquiry = inner
            .inquiries
            .get_mut(&id.as_i32())
            .ok_or(StorageError::NotFound)?;
        patch.apply_to(inquiry, Utc::now());
        Ok(inquiry.clone())
    }

    async fn get_chat_history(&self, filter: ChatFilter) -> Result<Vec<ChatEntry>> {
        let inner = self.read();
        Ok(inner
            .chat_entries
            .values()
            .filter(|e| {
                filter
                    .user_id
                    .as_ref()
                    .is_none_or(|uid| e.user_id.as_ref() == Some(uid))
            })
            .filter(|e| {
                filter
                    .session_id
                    .as_deref()
                    .is_none_or(|sid| e.session_id == sid)
            })
            .cloned()
            .collect())
    }

    async fn create_chat_entry(&self, entry: NewChatEntry) -> Result<ChatEntry> {
        let mut inner = self.write();
        let id = Counters::next(&mut inner.counters.chat);
        let record = ChatEntry {
            id: ChatEntryId::new(id),
            user_id: entry.user_id,
            session_id: entry.session_id,
            message: entry.message,
            response: entry.response,
            message_type: entry.message_type,
            created_at: Utc::now(),
        };
        inner.chat_entries.insert(id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_data_present() {
        let store = MemoryStorage::with_seed_data();
        let projects = store.get_projects(ProjectFilter::default()).await.unwrap();
        assert_eq!(projects.len(), 2);
        let products = store.get_products(ProductFilter::default()).await.unwrap();
        assert_eq!(products.len(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_after_seed() {
        let store = MemoryStorage::with_seed_data();
        let product = store
            .create_product(NewProduct {
                name: "Angle Grinder".to_owned(),
                description: None,
                category: Some("tools".to_owned()),
                price: Decimal::new(12500, 2),
                stock_quantity: 10,
                image_url: None,
                featured: false,
                rating: Decimal::new(500, 2),
                specifications: None,
            })
            .await
            .unwrap();
        assert_eq!(product.id, ProductId::new(3));
    }

    #[tokio::test]
    async fn test_search_matches_name_case_insensitively() {
        let store = MemoryStorage::with_seed_data();
        let hits = store.search_products("drill").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Premium Drill Kit");
    }

    #[tokio::test]
    async fn test_listing_filter_search_matches_substring() {
        let store = MemoryStorage::with_seed_data();
        let hits = store
            .get_products(ProductFilter {
                search: Some("DRILL".to_owned()),
                ..ProductFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Premium Drill Kit");
    }

    #[tokio::test]
    async fn test_create_then_get_returns_equal_record() {
        let store = MemoryStorage::new();
        let created = store
            .create_project(NewProject {
                title: "Depot Refit".to_owned(),
                description: None,
                category: None,
                status: "planning".to_owned(),
                budget: None,
                deposit_amount: None,
                client_name: None,
                client_email: None,
                client_phone: None,
                location: None,
                start_date: None,
                end_date: None,
                image_url: None,
                featured: false,
                user_id: None,
            })
            .await
            .unwrap();
        let fetched = store.get_project(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let store = MemoryStorage::new();
        let err = store
            .update_project(ProjectId::new(999_999), ProjectPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn test_order_created_with_items_in_one_call() {
        let store = MemoryStorage::with_seed_data();
        let (order, items) = store
            .create_order(
                NewOrder {
                    user_id: Some(UserId::from("u-1")),
                    status: OrderStatus::Pending,
                    total_amount: Decimal::new(33998, 2),
                    shipping_address: None,
                    payment_method: None,
                    payment_intent_id: None,
                    stripe_session_id: None,
                },
                vec![
                    NewOrderItem {
                        product_id: ProductId::new(1),
                        quantity: 1,
                        price: Decimal::new(8999, 2),
                    },
                    NewOrderItem {
                        product_id: ProductId::new(2),
                        quantity: 1,
                        price: Decimal::new(24999, 2),
                    },
                ],
            )
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        let stored = store.get_order_items(order.id).await.unwrap();
        assert_eq!(stored, items);
        let listed = store.get_orders(Some(&UserId::from("u-1"))).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(store.get_orders(Some(&UserId::from("u-2"))).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deposit_filters_compose() {
        let store = MemoryStorage::new();
        for (user, project) in [("u-1", 1), ("u-1", 2), ("u-2", 1)] {
            store
                .create_deposit(NewDeposit {
                    project_id: Some(ProjectId::new(project)),
                    user_id: Some(UserId::from(user)),
                    amount: Decimal::new(10_000, 0),
                    status: DepositStatus::Pending,
                    payment_method: None,
                    payment_intent_id: None,
                    mobile_money_reference: None,
                })
                .await
                .unwrap();
        }
        let filtered = store
            .get_deposits(DepositFilter {
                user_id: Some(UserId::from("u-1")),
                project_id: Some(ProjectId::new(1)),
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[tokio::test]
    async fn test_chat_history_scoped_by_session() {
        let store = MemoryStorage::new();
        for session in ["s-1", "s-1", "s-2"] {
            store
                .create_chat_entry(NewChatEntry {
                    user_id: None,
                    session_id: session.to_owned(),
                    message: "hello".to_owned(),
                    response: "hi there".to_owned(),
                    message_type: "general".to_owned(),
                })
                .await
                .unwrap();
        }
        let history = store
            .get_chat_history(ChatFilter {
                user_id: None,
                session_id: Some("s-1".to_owned()),
            })
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
    }
}
