//! # Validation Module
//!
//! Input validation for the storefront's business rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser shell                                                 │
//! │  ├── Required-field markers on the order-type form                      │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront command (Rust)                                     │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: Business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order intake / lifecycle                                      │
//! │  └── Nothing is persisted unless every check passed                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tcb_core::money::Money;
//! use tcb_core::validation::{validate_price, validate_quantity};
//!
//! validate_price(Money::from_pesos(15_000)).unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CustomerProfile, OrderType, Product, Promotion};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Customer
// =============================================================================

/// Validates the order-type form.
///
/// ## Rules
/// - `customerName` and `customerPhone` non-empty after trimming
/// - `address` non-empty when the order is a delivery
///
/// Phones are free text: customers type `(300) 123-4567`, `+57 300...`
/// or plain digits, and the admin reads them back as written.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Order-type form: Continue                                              │
/// │                                                                         │
/// │  validate_customer_profile(profile) ← THIS FUNCTION                     │
/// │       │                                                                 │
/// │       ├── name blank?              → "customerName is required"         │
/// │       ├── phone blank?             → "customerPhone is required"        │
/// │       ├── delivery, address blank? → "address is required"              │
/// │       │                                                                 │
/// │       └── OK → checkout                                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_customer_profile(profile: &CustomerProfile) -> ValidationResult<()> {
    if profile.customer_name.trim().is_empty() {
        return Err(ValidationError::required("customerName"));
    }

    if profile.customer_phone.trim().is_empty() {
        return Err(ValidationError::required("customerPhone"));
    }

    if profile.order_type == OrderType::Delivery {
        let has_address = profile
            .address
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty());
        if !has_address {
            return Err(ValidationError::required("address"));
        }
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a menu or order line price: positive, at most [`Money::MAX`].
///
/// ## Example
/// ```rust
/// use tcb_core::money::Money;
/// use tcb_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_pesos(15_000)).is_ok());
/// assert!(validate_price(Money::zero()).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if !price.in_range() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 1,
            max: Money::MAX.pesos(),
        });
    }

    Ok(())
}

/// Validates the cash drawer base. Zero is allowed.
pub fn validate_cash_base(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() || !amount.in_range() {
        return Err(ValidationError::OutOfRange {
            field: "cashBase".to_string(),
            min: 0,
            max: Money::MAX.pesos(),
        });
    }

    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

/// Validates a product from the admin form: name required, positive price.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    let name = product.name.trim();
    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    validate_price(product.price)
}

/// Validates a promotion: title and description required.
pub fn validate_promotion(promotion: &Promotion) -> ValidationResult<()> {
    if promotion.title.trim().is_empty() {
        return Err(ValidationError::required("title"));
    }
    if promotion.description.trim().is_empty() {
        return Err(ValidationError::required("description"));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductCategory;
    use chrono::NaiveDate;

    fn profile(order_type: OrderType) -> CustomerProfile {
        CustomerProfile {
            order_type,
            customer_name: "Ana".to_string(),
            customer_phone: "3001234567".to_string(),
            address: None,
            address_details: None,
            table_number: None,
            notes: None,
        }
    }

    #[test]
    fn test_validate_customer_profile() {
        assert!(validate_customer_profile(&profile(OrderType::Pickup)).is_ok());
        assert!(validate_customer_profile(&profile(OrderType::DineIn)).is_ok());

        let delivery = profile(OrderType::Delivery);
        assert!(matches!(
            validate_customer_profile(&delivery),
            Err(ValidationError::Required { field }) if field == "address"
        ));

        let mut delivery = profile(OrderType::Delivery);
        delivery.address = Some("   ".to_string());
        assert!(validate_customer_profile(&delivery).is_err());
        delivery.address = Some("Calle 10".to_string());
        assert!(validate_customer_profile(&delivery).is_ok());

        let mut no_phone = profile(OrderType::Pickup);
        no_phone.customer_phone = String::new();
        assert!(matches!(
            validate_customer_profile(&no_phone),
            Err(ValidationError::Required { field }) if field == "customerPhone"
        ));
    }

    #[test]
    fn test_customer_phone_is_free_text() {
        for phone in ["(300) 123-4567", "+57 300 123 4567", "300.123.4567", "3001234567"] {
            let mut p = profile(OrderType::Pickup);
            p.customer_phone = phone.to_string();
            assert!(validate_customer_profile(&p).is_ok(), "{phone}");
        }

        let mut long_name = profile(OrderType::DineIn);
        long_name.customer_name = "Ana María ".repeat(40);
        assert!(validate_customer_profile(&long_name).is_ok());

        let mut blank = profile(OrderType::Pickup);
        blank.customer_phone = "   ".to_string();
        assert!(validate_customer_profile(&blank).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_money_fields() {
        assert!(validate_price(Money::from_pesos(1)).is_ok());
        assert!(validate_price(Money::from_pesos(-1)).is_err());
        assert!(validate_price(Money::MAX).is_ok());
        assert!(validate_price(Money::MAX + Money::from_centavos(1)).is_err());
        assert!(validate_cash_base(Money::from_centavos(i64::MAX)).is_err());
        assert!(validate_cash_base(Money::zero()).is_ok());
        assert!(validate_cash_base(Money::from_pesos(-100)).is_err());
    }

    #[test]
    fn test_validate_catalog_entries() {
        let product = Product {
            id: 1,
            name: "Perro sencillo".to_string(),
            price: Money::from_pesos(9_000),
            category: ProductCategory::Food,
            subcategory: Some("perros".to_string()),
            image: String::new(),
            description: String::new(),
            specifications: String::new(),
        };
        assert!(validate_product(&product).is_ok());
        assert!(validate_product(&Product {
            name: " ".to_string(),
            ..product.clone()
        })
        .is_err());

        let promotion = Promotion {
            id: 1,
            title: "2x1".to_string(),
            description: "Martes de hamburguesas".to_string(),
            discount: "50%".to_string(),
            valid_until: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            image: String::new(),
            is_active: true,
        };
        assert!(validate_promotion(&promotion).is_ok());
        assert!(validate_promotion(&Promotion {
            description: String::new(),
            ..promotion
        })
        .is_err());
    }
}
