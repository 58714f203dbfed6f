//! # Catalog Repository
//!
//! Products and promotions managed from the admin panel.
//!
//! ## Snapshot Rule
//! Editing or deleting a product never touches carts, sales or invoices:
//! those hold their own copies of the product fields.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use super::next_millis_id;
use crate::collection::Collection;
use crate::error::DbResult;
use crate::store::{keys, KvStore};
use tcb_core::validation::{validate_product, validate_promotion};
use tcb_core::{CoreError, Product, ProductCategory, Promotion};

const PRODUCTS: Collection<Product> = Collection::new(keys::PRODUCTS);
const PROMOTIONS: Collection<Promotion> = Collection::new(keys::PROMOTIONS);

/// Repository for the menu and promotion banners.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    store: KvStore,
}

impl CatalogRepository {
    pub fn new(store: KvStore) -> Self {
        CatalogRepository { store }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Every product, in stored order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        PRODUCTS.load(&self.store).await
    }

    /// Products of one menu section.
    pub async fn by_category(&self, category: ProductCategory) -> DbResult<Vec<Product>> {
        let mut products = self.list().await?;
        products.retain(|p| p.category == category);
        Ok(products)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        Ok(self.list().await?.into_iter().find(|p| p.id == id))
    }

    /// Adds a product under a fresh timestamp id.
    ///
    /// The incoming `id` is ignored.
    pub async fn add(&self, mut product: Product, now: DateTime<Utc>) -> DbResult<Product> {
        validate_product(&product)?;
        normalize_product(&mut product);

        let _guard = self.store.lock().await;
        let mut products = PRODUCTS.load(&self.store).await?;

        product.id = next_millis_id(now, |id| products.iter().any(|p| p.id == id));
        debug!(id = product.id, name = %product.name, "Adding product");

        products.push(product.clone());
        PRODUCTS.save(&self.store, &products).await?;
        Ok(product)
    }

    /// Replaces the product with the same id.
    pub async fn update(&self, mut product: Product) -> DbResult<Product> {
        validate_product(&product)?;
        normalize_product(&mut product);

        let _guard = self.store.lock().await;
        let mut products = PRODUCTS.load(&self.store).await?;

        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(CoreError::ProductNotFound(product.id))?;
        *slot = product.clone();

        debug!(id = product.id, "Updating product");
        PRODUCTS.save(&self.store, &products).await?;
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let _guard = self.store.lock().await;
        let mut products = PRODUCTS.load(&self.store).await?;

        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(CoreError::ProductNotFound(id).into());
        }

        info!(id, "Deleting product");
        PRODUCTS.save(&self.store, &products).await
    }

    /// Writes `defaults` when no product list is stored yet.
    ///
    /// Returns whether anything was written. An empty stored list counts as
    /// stored: the owner may have deleted every product on purpose.
    pub async fn seed_if_empty(&self, defaults: &[Product]) -> DbResult<bool> {
        let _guard = self.store.lock().await;
        if self.store.get(keys::PRODUCTS).await?.is_some() {
            return Ok(false);
        }

        info!(count = defaults.len(), "Seeding default menu");
        PRODUCTS.save(&self.store, defaults).await?;
        Ok(true)
    }

    pub async fn count(&self) -> DbResult<usize> {
        Ok(self.list().await?.len())
    }

    // =========================================================================
    // Promotions
    // =========================================================================

    pub async fn list_promotions(&self) -> DbResult<Vec<Promotion>> {
        PROMOTIONS.load(&self.store).await
    }

    /// Promotions switched on and not yet expired on `today`.
    pub async fn active_promotions(&self, today: NaiveDate) -> DbResult<Vec<Promotion>> {
        let mut promotions = self.list_promotions().await?;
        promotions.retain(|p| p.is_active && p.valid_until >= today);
        Ok(promotions)
    }

    /// Adds a promotion under a fresh timestamp id.
    pub async fn add_promotion(
        &self,
        mut promotion: Promotion,
        now: DateTime<Utc>,
    ) -> DbResult<Promotion> {
        validate_promotion(&promotion)?;

        let _guard = self.store.lock().await;
        let mut promotions = PROMOTIONS.load(&self.store).await?;

        promotion.id = next_millis_id(now, |id| promotions.iter().any(|p| p.id == id));
        debug!(id = promotion.id, title = %promotion.title, "Adding promotion");

        promotions.push(promotion.clone());
        PROMOTIONS.save(&self.store, &promotions).await?;
        Ok(promotion)
    }

    pub async fn update_promotion(&self, promotion: Promotion) -> DbResult<Promotion> {
        validate_promotion(&promotion)?;
        self.modify_promotion(promotion.id, |slot| *slot = promotion.clone())
            .await
    }

    pub async fn set_promotion_active(&self, id: i64, active: bool) -> DbResult<Promotion> {
        self.modify_promotion(id, |slot| slot.is_active = active).await
    }

    pub async fn delete_promotion(&self, id: i64) -> DbResult<()> {
        let _guard = self.store.lock().await;
        let mut promotions = PROMOTIONS.load(&self.store).await?;

        let before = promotions.len();
        promotions.retain(|p| p.id != id);
        if promotions.len() == before {
            return Err(CoreError::PromotionNotFound(id).into());
        }

        info!(id, "Deleting promotion");
        PROMOTIONS.save(&self.store, &promotions).await
    }

    /// Writes `defaults` when no promotion list is stored yet.
    pub async fn seed_promotions_if_empty(&self, defaults: &[Promotion]) -> DbResult<bool> {
        let _guard = self.store.lock().await;
        if self.store.get(keys::PROMOTIONS).await?.is_some() {
            return Ok(false);
        }

        PROMOTIONS.save(&self.store, defaults).await?;
        Ok(true)
    }

    async fn modify_promotion(
        &self,
        id: i64,
        change: impl FnOnce(&mut Promotion),
    ) -> DbResult<Promotion> {
        let _guard = self.store.lock().await;
        let mut promotions = PROMOTIONS.load(&self.store).await?;

        let slot = promotions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::PromotionNotFound(id))?;
        change(slot);
        let updated = slot.clone();

        debug!(id, active = updated.is_active, "Updating promotion");
        PROMOTIONS.save(&self.store, &promotions).await?;
        Ok(updated)
    }
}

/// Subcategories only apply to food; names are stored trimmed.
fn normalize_product(product: &mut Product) {
    product.name = product.name.trim().to_string();
    if product.category != ProductCategory::Food {
        product.subcategory = None;
    }
    if product
        .subcategory
        .as_deref()
        .is_some_and(|s| s.trim().is_empty())
    {
        product.subcategory = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use tcb_core::Money;

    fn product(name: &str, price: i64, category: ProductCategory) -> Product {
        Product {
            id: 0,
            name: name.to_string(),
            price: Money::from_pesos(price),
            category,
            subcategory: Some("hamburguesas".to_string()),
            image: "/placeholder.svg".to_string(),
            description: String::new(),
            specifications: String::new(),
        }
    }

    fn promotion(title: &str, active: bool, until: NaiveDate) -> Promotion {
        Promotion {
            id: 0,
            title: title.to_string(),
            description: "Doble carne".to_string(),
            discount: "30% OFF".to_string(),
            valid_until: until,
            image: String::new(),
            is_active: active,
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[tokio::test]
    async fn test_add_assigns_distinct_ids() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();
        let now = at(1_700_000_000_000);

        let a = catalog.add(product("Burger", 15_000, ProductCategory::Food), now).await.unwrap();
        let b = catalog.add(product("Coca-Cola", 4_000, ProductCategory::Drinks), now).await.unwrap();

        assert_eq!(a.id, 1_700_000_000_000);
        assert_eq!(b.id, 1_700_000_000_001);
        assert_eq!(b.subcategory, None);
        assert_eq!(catalog.count().await.unwrap(), 2);
        assert_eq!(catalog.by_category(ProductCategory::Drinks).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        let mut burger = catalog
            .add(product("Burger", 15_000, ProductCategory::Food), at(1))
            .await
            .unwrap();
        burger.price = Money::from_pesos(16_000);
        catalog.update(burger.clone()).await.unwrap();
        assert_eq!(
            catalog.get(burger.id).await.unwrap().unwrap().price,
            Money::from_pesos(16_000)
        );

        catalog.delete(burger.id).await.unwrap();
        assert!(catalog.get(burger.id).await.unwrap().is_none());
        assert!(matches!(
            catalog.delete(burger.id).await,
            Err(DbError::Domain(CoreError::ProductNotFound(_)))
        ));
        assert!(catalog.update(burger).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_product_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let result = db
            .catalog()
            .add(product("Burger", 0, ProductCategory::Food), at(1))
            .await;
        assert!(matches!(result, Err(DbError::Domain(CoreError::Validation(_)))));
        assert_eq!(db.catalog().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_only_when_unset() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();
        let menu = vec![product("Burger", 15_000, ProductCategory::Food)];

        assert!(catalog.seed_if_empty(&menu).await.unwrap());
        assert!(!catalog.seed_if_empty(&menu).await.unwrap());
        assert_eq!(catalog.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_promotions() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let live = catalog
            .add_promotion(promotion("Maxi Queso", true, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()), at(10))
            .await
            .unwrap();
        catalog
            .add_promotion(promotion("Vencida", true, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()), at(10))
            .await
            .unwrap();

        assert_eq!(catalog.active_promotions(today).await.unwrap().len(), 1);

        let off = catalog.set_promotion_active(live.id, false).await.unwrap();
        assert!(!off.is_active);
        assert!(catalog.active_promotions(today).await.unwrap().is_empty());

        catalog.delete_promotion(live.id).await.unwrap();
        assert_eq!(catalog.list_promotions().await.unwrap().len(), 1);
        assert!(matches!(
            catalog.set_promotion_active(live.id, true).await,
            Err(DbError::Domain(CoreError::PromotionNotFound(_)))
        ));
    }
}
