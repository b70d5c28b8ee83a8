//! Catalog products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::ProductCategory;
use super::id::ProductId;
use super::slug::slugify;

/// A product in the catalog.
///
/// `slug` always equals `slugify(name)` for products created or updated
/// through the catalog store. `created_at` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: ProductCategory,
    pub description: String,
    pub short_description: String,
    /// `None` means "price on request".
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_note: Option<String>,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order: Option<u32>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub available: bool,
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields an editor supplies when creating a product.
///
/// The catalog store fills in `id`, `slug`, `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_note: Option<String>,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order: Option<u32>,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

const fn default_true() -> bool {
    true
}

impl NewProduct {
    /// Minimal product draft: available, not featured, no price.
    #[must_use]
    pub fn new(name: impl Into<String>, category: ProductCategory, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            description: String::new(),
            short_description: String::new(),
            price: None,
            price_note: None,
            unit: unit.into(),
            min_order: None,
            image: String::new(),
            images: None,
            available: true,
            featured: false,
            tags: None,
        }
    }

    /// Materialize the draft into a product with the given identity and timestamp.
    #[must_use]
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            slug: slugify(&self.name),
            name: self.name,
            category: self.category,
            description: self.description,
            short_description: self.short_description,
            price: self.price,
            price_note: self.price_note,
            unit: self.unit,
            min_order: self.min_order,
            image: self.image,
            images: self.images,
            available: self.available,
            featured: self.featured,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Summary numbers shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_products: usize,
    pub featured_products: usize,
    pub categories_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "id": "pagnotta-classica",
        "name": "Pagnotta Classica",
        "slug": "pagnotta-classica",
        "category": "pani-classici",
        "description": "La nostra pagnotta tradizionale da 1kg.",
        "shortDescription": "Pagnotta tradizionale 1kg",
        "price": null,
        "priceNote": "Prezzo su richiesta",
        "unit": "kg",
        "minOrder": 5,
        "image": "/images/products/pagnotta-classica.jpg",
        "available": true,
        "featured": true,
        "tags": ["lievito madre", "tradizionale"],
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
    }"#;

    #[test]
    fn test_deserializes_canonical_product() {
        let product: Product = serde_json::from_str(SEED).unwrap();
        assert_eq!(product.id.as_str(), "pagnotta-classica");
        assert_eq!(product.category, ProductCategory::PaniClassici);
        assert_eq!(product.price, None);
        assert_eq!(product.min_order, Some(5));
        assert!(product.images.is_none());
    }

    #[test]
    fn test_numeric_price_round_trip() {
        let mut value: serde_json::Value = serde_json::from_str(SEED).unwrap();
        value["price"] = serde_json::json!(3.5);
        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.price, Some(Decimal::new(35, 1)));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["price"], serde_json::json!(3.5));
        assert!(back.get("images").is_none());
    }

    #[test]
    fn test_rejects_unknown_category() {
        let bad = SEED.replace("pani-classici", "dolci");
        assert!(serde_json::from_str::<Product>(&bad).is_err());
    }

    #[test]
    fn test_into_product_derives_slug_and_timestamps() {
        let now = Utc::now();
        let product = NewProduct::new("Pane Test", ProductCategory::PaniClassici, "pz")
            .into_product(ProductId::new("p1"), now);

        assert_eq!(product.slug, "pane-test");
        assert_eq!(product.created_at, now);
        assert_eq!(product.updated_at, now);
        assert!(product.available);
        assert!(!product.featured);
    }

    #[test]
    fn test_new_product_defaults_from_json() {
        let draft: NewProduct =
            serde_json::from_str(r#"{"name":"Focaccia","category":"formati-ristorazione","unit":"teglia"}"#)
                .unwrap();
        assert!(draft.available);
        assert!(!draft.featured);
        assert_eq!(draft.price, None);
    }
}
