//! Database seeding command.
//!
//! Inserts the demo portfolio and catalog a fresh install expects, matching
//! the data the in-memory backend starts with. Skips seeding when data is
//! already present so reruns are safe.

use rust_decimal::Decimal;

use sterling_api::models::{NewProduct, NewProject};
use sterling_api::storage::{PgStorage, Storage};

use super::{CommandError, connect};

/// Seed the database with demo data.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the connection fails, or an
/// insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        tracing::info!("Database already has {existing} products, skipping seed");
        return Ok(());
    }

    let storage = PgStorage::new(pool);

    for (title, category, status, budget, location) in [
        ("Modern Office Building", "commercial", "completed", 2_500_000, "Kampala"),
        ("Residential Complex", "residential", "in_progress", 1_800_000, "Entebbe"),
    ] {
        storage
            .create_project(NewProject {
                title: title.to_owned(),
                description: Some(format!("{title} delivered by Sterling Contractors.")),
                category: Some(category.to_owned()),
                status: status.to_owned(),
                budget: Some(Decimal::from(budget)),
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
            })
            .await?;
        tracing::info!("Seeded project: {title}");
    }

    for (name, category, price_cents, stock, rating_hundredths) in [
        ("Professional Hammer Set", "tools", 8999_i64, 50, 480_i64),
        ("Premium Drill Kit", "tools", 24999, 25, 490),
    ] {
        storage
            .create_product(NewProduct {
                name: name.to_owned(),
                description: Some(format!("{name} for professional site work.")),
                category: Some(category.to_owned()),
                price: Decimal::new(price_cents, 2),
                stock_quantity: stock,
                image_url: None,
                featured: true,
                rating: Decimal::new(rating_hundredths, 2),
                specifications: None,
            })
            .await?;
        tracing::info!("Seeded product: {name}");
    }

    tracing::info!("Seeding complete!");
    Ok(())
}
