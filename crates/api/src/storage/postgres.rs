//! Postgres storage backend.
//!
//! Queries are built at runtime (with [`QueryBuilder`] for the dynamic
//! filter/patch clauses) rather than the compile-time checked macros, since
//! filters and partial updates vary per request. Statuses are stored as
//! lowercase text and parsed on the way out; an unparsable value surfaces as
//! [`StorageError::DataCorruption`] instead of a panic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use sterling_core::{
    ChatEntryId, DepositId, DepositStatus, Email, InquiryId, InquiryStatus, OrderId,
    OrderItemId, OrderStatus, ProductId, ProjectId, UserId,
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

/// Postgres-backed [`Storage`].
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: Option<Email>,
    first_name: Option<String>,
    last_name: Option<String>,
    profile_image_url: Option<String>,
    stripe_customer_id: Option<String>,
    stripe_subscription_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_image_url: row.profile_image_url,
            stripe_customer_id: row.stripe_customer_id,
            stripe_subscription_id: row.stripe_subscription_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: ProjectId,
    title: String,
    description: Option<String>,
    category: Option<String>,
    status: String,
    budget: Option<Decimal>,
    deposit_amount: Option<Decimal>,
    client_name: Option<String>,
    client_email: Option<String>,
    client_phone: Option<String>,
    location: Option<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    image_url: Option<String>,
    featured: bool,
    user_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            status: row.status,
            budget: row.budget,
            deposit_amount: row.deposit_amount,
            client_name: row.client_name,
            client_email: row.client_email,
            client_phone: row.client_phone,
            location: row.location,
            start_date: row.start_date,
            end_date: row.end_date,
            image_url: row.image_url,
            featured: row.featured,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    category: Option<String>,
    price: Decimal,
    stock_quantity: i32,
    image_url: Option<String>,
    featured: bool,
    rating: Decimal,
    specifications: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            price: row.price,
            stock_quantity: row.stock_quantity,
            image_url: row.image_url,
            featured: row.featured,
            rating: row.rating,
            specifications: row.specifications,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: Option<UserId>,
    status: String,
    total_amount: Decimal,
    shipping_address: Option<String>,
    payment_method: Option<String>,
    payment_intent_id: Option<String>,
    stripe_session_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StorageError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(StorageError::DataCorruption)?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            status,
            total_amount: row.total_amount,
            shipping_address: row.shipping_address,
            payment_method: row.payment_method,
            payment_intent_id: row.payment_intent_id,
            stripe_session_id: row.stripe_session_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DepositRow {
    id: DepositId,
    project_id: Option<ProjectId>,
    user_id: Option<UserId>,
    amount: Decimal,
    status: String,
    payment_method: Option<String>,
    payment_intent_id: Option<String>,
    mobile_money_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DepositRow> for Deposit {
    type Error = StorageError;

    fn try_from(row: DepositRow) -> Result<Self> {
        let status = row
            .status
            .parse::<DepositStatus>()
            .map_err(StorageError::DataCorruption)?;
        Ok(Self {
            id: row.id,
            project_id: row.project_id,
            user_id: row.user_id,
            amount: row.amount,
            status,
            payment_method: row.payment_method,
            payment_intent_id: row.payment_intent_id,
            mobile_money_reference: row.mobile_money_reference,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct InquiryRow {
    id: InquiryId,
    first_name: String,
    last_name: String,
    email: Email,
    phone: Option<String>,
    project_type: Option<String>,
    message: String,
    status: String,
    user_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InquiryRow> for Inquiry {
    type Error = StorageError;

    fn try_from(row: InquiryRow) -> Result<Self> {
        let status = row
            .status
            .parse::<InquiryStatus>()
            .map_err(StorageError::DataCorruption)?;
        Ok(Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            project_type: row.project_type,
            message: row.message,
            status,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ChatEntryRow {
    id: ChatEntryId,
    user_id: Option<UserId>,
    session_id: String,
    message: String,
    response: String,
    message_type: String,
    created_at: DateTime<Utc>,
}

impl From<ChatEntryRow> for ChatEntry {
    fn from(row: ChatEntryRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            session_id: row.session_id,
            message: row.message,
            response: row.response,
            message_type: row.message_type,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                profile_image_url = EXCLUDED.profile_image_url,
                updated_at = NOW()
            RETURNING *
            ",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_user_stripe_info(
        &self,
        id: &UserId,
        customer_id: String,
        subscription_id: Option<String>,
    ) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE users
            SET stripe_customer_id = $2,
                stripe_subscription_id = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(&customer_id)
        .bind(&subscription_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;
        Ok(row.into())
    }

    async fn get_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM projects WHERE TRUE");
        if let Some(featured) = filter.featured {
            qb.push(" AND featured = ").push_bind(featured);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
        let rows: Vec<ProjectRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Project::from))
    }

    async fn create_project(&self, project: NewProject) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r"
            INSERT INTO projects (
                title, description, category, status, budget, deposit_amount,
                client_name, client_email, client_phone, location,
                start_date, end_date, image_url, featured, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            ",
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.category)
        .bind(&project.status)
        .bind(project.budget)
        .bind(project.deposit_amount)
        .bind(&project.client_name)
        .bind(&project.client_email)
        .bind(&project.client_phone)
        .bind(&project.location)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(&project.image_url)
        .bind(project.featured)
        .bind(&project.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE projects SET updated_at = NOW()");
        if let Some(title) = patch.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = patch.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(category) = patch.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status);
        }
        if let Some(budget) = patch.budget {
            qb.push(", budget = ").push_bind(budget);
        }
        if let Some(deposit_amount) = patch.deposit_amount {
            qb.push(", deposit_amount = ").push_bind(deposit_amount);
        }
        if let Some(client_name) = patch.client_name {
            qb.push(", client_name = ").push_bind(client_name);
        }
        if let Some(client_email) = patch.client_email {
            qb.push(", client_email = ").push_bind(client_email);
        }
        if let Some(client_phone) = patch.client_phone {
            qb.push(", client_phone = ").push_bind(client_phone);
        }
        if let Some(location) = patch.location {
            qb.push(", location = ").push_bind(location);
        }
        if let Some(start_date) = patch.start_date {
            qb.push(", start_date = ").push_bind(start_date);
        }
        if let Some(end_date) = patch.end_date {
            qb.push(", end_date = ").push_bind(end_date);
        }
        if let Some(image_url) = patch.image_url {
            qb.push(", image_url = ").push_bind(image_url);
        }
        if let Some(featured) = patch.featured {
            qb.push(", featured = ").push_bind(featured);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
        let row: ProjectRow = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;
        Ok(row.into())
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM products WHERE TRUE");
        if let Some(category) = filter.category {
            qb.push(" AND category = ").push_bind(category);
        }
        if let Some(featured) = filter.featured {
            qb.push(" AND featured = ").push_bind(featured);
        }
        if let Some(search) = filter.search {
            let pattern = format!("%{search}%");
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR category ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY created_at DESC, id DESC");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT * FROM products
            WHERE name ILIKE '%' || $1 || '%'
               OR description ILIKE '%' || $1 || '%'
               OR category ILIKE '%' || $1 || '%'
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (
                name, description, category, price, stock_quantity,
                image_url, featured, rating, specifications
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.stock_quantity)
        .bind(&product.image_url)
        .bind(product.featured)
        .bind(product.rating)
        .bind(&product.specifications)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE products SET updated_at = NOW()");
        if let Some(name) = patch.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(description) = patch.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(category) = patch.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(price) = patch.price {
            qb.push(", price = ").push_bind(price);
        }
        if let Some(stock_quantity) = patch.stock_quantity {
            qb.push(", stock_quantity = ").push_bind(stock_quantity);
        }
        if let Some(image_url) = patch.image_url {
            qb.push(", image_url = ").push_bind(image_url);
        }
        if let Some(featured) = patch.featured {
            qb.push(", featured = ").push_bind(featured);
        }
        if let Some(rating) = patch.rating {
            qb.push(", rating = ").push_bind(rating);
        }
        if let Some(specifications) = patch.specifications {
            qb.push(", specifications = ").push_bind(specifications);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
        let row: ProductRow = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;
        Ok(row.into())
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_orders(&self, user_id: Option<&UserId>) -> Result<Vec<Order>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM orders WHERE TRUE");
        if let Some(user_id) = user_id {
            qb.push(" AND user_id = ").push_bind(user_id.as_str().to_owned());
        }
        qb.push(" ORDER BY created_at DESC, id DESC");
        let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Order::try_from).transpose()
    }

    async fn create_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<(Order, Vec<OrderItem>)> {
        // Header and lines land together or not at all.
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (
                user_id, status, total_amount, shipping_address,
                payment_method, payment_intent_id, stripe_session_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(&order.user_id)
        .bind(order.status.as_str())
        .bind(order.total_amount)
        .bind(&order.shipping_address)
        .bind(&order.payment_method)
        .bind(&order.payment_intent_id)
        .bind(&order.stripe_session_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let line_row = sqlx::query_as::<_, OrderItemRow>(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                ",
            )
            .bind(order_row.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await?;
            lines.push(OrderItem::from(line_row));
        }

        tx.commit().await?;
        Ok((Order::try_from(order_row)?, lines))
    }

    async fn update_order(&self, id: OrderId, patch: OrderPatch) -> Result<Order> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE orders SET updated_at = NOW()");
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(shipping_address) = patch.shipping_address {
            qb.push(", shipping_address = ").push_bind(shipping_address);
        }
        if let Some(payment_method) = patch.payment_method {
            qb.push(", payment_method = ").push_bind(payment_method);
        }
        if let Some(payment_intent_id) = patch.payment_intent_id {
            qb.push(", payment_intent_id = ").push_bind(payment_intent_id);
        }
        if let Some(stripe_session_id) = patch.stripe_session_id {
            qb.push(", stripe_session_id = ").push_bind(stripe_session_id);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
        let row: OrderRow = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;
        row.try_into()
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn get_deposits(&self, filter: DepositFilter) -> Result<Vec<Deposit>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM deposits WHERE TRUE");
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.into_inner());
        }
        if let Some(project_id) = filter.project_id {
            qb.push(" AND project_id = ").push_bind(project_id);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");
        let rows: Vec<DepositRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Deposit::try_from).collect()
    }

    async fn get_deposit(&self, id: DepositId) -> Result<Option<Deposit>> {
        let row = sqlx::query_as::<_, DepositRow>("SELECT * FROM deposits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Deposit::try_from).transpose()
    }

    async fn create_deposit(&self, deposit: NewDeposit) -> Result<Deposit> {
        let row = sqlx::query_as::<_, DepositRow>(
            r"
            INSERT INTO deposits (
                project_id, user_id, amount, status,
                payment_method, payment_intent_id, mobile_money_reference
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(deposit.project_id)
        .bind(&deposit.user_id)
        .bind(deposit.amount)
        .bind(deposit.status.as_str())
        .bind(&deposit.payment_method)
        .bind(&deposit.payment_intent_id)
        .bind(&deposit.mobile_money_reference)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_deposit(&self, id: DepositId, patch: DepositPatch) -> Result<Deposit> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE deposits SET updated_at = NOW()");
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(payment_method) = patch.payment_method {
            qb.push(", payment_method = ").push_bind(payment_method);
        }
        if let Some(payment_intent_id) = patch.payment_intent_id {
            qb.push(", payment_intent_id = ").push_bind(payment_intent_id);
        }
        if let Some(reference) = patch.mobile_money_reference {
            qb.push(", mobile_money_reference = ").push_bind(reference);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
        let row: DepositRow = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;
        row.try_into()
    }

    async fn get_inquiries(&self, filter: InquiryFilter) -> Result<Vec<Inquiry>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM inquiries WHERE TRUE");
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.into_inner());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY created_at DESC, id DESC");
        let rows: Vec<InquiryRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Inquiry::try_from).collect()
    }

    async fn get_inquiry(&self, id: InquiryId) -> Result<Option<Inquiry>> {
        let row = sqlx::query_as::<_, InquiryRow>("SELECT * FROM inquiries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Inquiry::try_from).transpose()
    }

    async fn create_inquiry(&self, inquiry: NewInquiry) -> Result<Inquiry> {
        let row = sqlx::query_as::<_, InquiryRow>(
            r"
            INSERT INTO inquiries (
                first_name, last_name, email, phone, project_type, message, status, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            ",
        )
        .bind(&inquiry.first_name)
        .bind(&inquiry.last_name)
        .bind(&inquiry.email)
        .bind(&inquiry.phone)
        .bind(&inquiry.project_type)
        .bind(&inquiry.message)
        .bind(InquiryStatus::New.as_str())
        .bind(&inquiry.user_id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_inquiry(&self, id: InquiryId, patch: InquiryPatch) -> Result<Inquiry> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE inquiries SET updated_at = NOW()");
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
        let row: InquiryRow = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;
        row.try_into()
    }

    async fn get_chat_history(&self, filter: ChatFilter) -> Result<Vec<ChatEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM chat_history WHERE TRUE");
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.into_inner());
        }
        if let Some(session_id) = filter.session_id {
            qb.push(" AND session_id = ").push_bind(session_id);
        }
        qb.push(" ORDER BY created_at, id");
        let rows: Vec<ChatEntryRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(ChatEntry::from).collect())
    }

    async fn create_chat_entry(&self, entry: NewChatEntry) -> Result<ChatEntry> {
        let row = sqlx::query_as::<_, ChatEntryRow>(
            r"
            INSERT INTO chat_history (user_id, session_id, message, response, message_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(&entry.user_id)
        .bind(&entry.session_id)
        .bind(&entry.message)
        .bind(&entry.response)
        .bind(&entry.message_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}
