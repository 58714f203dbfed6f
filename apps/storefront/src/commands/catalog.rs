//! # Catalog Commands
//!
//! Menu browsing for customers, product and promotion management for the
//! admin panel.

use chrono::{Local, Utc};
use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use tcb_core::{CoreError, Product, ProductCategory, Promotion};

/// Every product on the menu.
pub async fn list_products(db: &DbState) -> Result<Vec<Product>, ApiError> {
    debug!("list_products command");
    Ok(db.inner().catalog().list().await?)
}

/// One menu section (food, drinks, promotion).
pub async fn products_by_category(
    db: &DbState,
    category: ProductCategory,
) -> Result<Vec<Product>, ApiError> {
    debug!(?category, "products_by_category command");
    Ok(db.inner().catalog().by_category(category).await?)
}

/// Adds a product; the stored copy carries a fresh timestamp id.
pub async fn add_product(db: &DbState, product: Product) -> Result<Product, ApiError> {
    debug!(name = %product.name, "add_product command");
    Ok(db.inner().catalog().add(product, Utc::now()).await?)
}

/// Replaces a product by id.
///
/// Carts and orders keep the copy they already hold.
pub async fn update_product(db: &DbState, product: Product) -> Result<Product, ApiError> {
    debug!(id = product.id, "update_product command");
    Ok(db.inner().catalog().update(product).await?)
}

pub async fn delete_product(db: &DbState, id: i64) -> Result<(), ApiError> {
    debug!(id, "delete_product command");
    Ok(db.inner().catalog().delete(id).await?)
}

/// Every promotion, active or not (admin view).
pub async fn list_promotions(db: &DbState) -> Result<Vec<Promotion>, ApiError> {
    debug!("list_promotions command");
    Ok(db.inner().catalog().list_promotions().await?)
}

/// Promotions the storefront shows today.
pub async fn active_promotions(db: &DbState) -> Result<Vec<Promotion>, ApiError> {
    debug!("active_promotions command");
    let today = Local::now().date_naive();
    Ok(db.inner().catalog().active_promotions(today).await?)
}

pub async fn add_promotion(db: &DbState, promotion: Promotion) -> Result<Promotion, ApiError> {
    debug!(title = %promotion.title, "add_promotion command");
    Ok(db.inner().catalog().add_promotion(promotion, Utc::now()).await?)
}

pub async fn update_promotion(db: &DbState, promotion: Promotion) -> Result<Promotion, ApiError> {
    debug!(id = promotion.id, "update_promotion command");
    Ok(db.inner().catalog().update_promotion(promotion).await?)
}

pub async fn delete_promotion(db: &DbState, id: i64) -> Result<(), ApiError> {
    debug!(id, "delete_promotion command");
    Ok(db.inner().catalog().delete_promotion(id).await?)
}

/// Flips a promotion between active and inactive.
pub async fn toggle_promotion(db: &DbState, id: i64) -> Result<Promotion, ApiError> {
    debug!(id, "toggle_promotion command");
    let catalog = db.inner().catalog();

    let current = catalog
        .list_promotions()
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or(CoreError::PromotionNotFound(id))?;

    Ok(catalog.set_promotion_active(id, !current.is_active).await?)
}
