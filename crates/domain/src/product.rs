use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DomainResult;
use crate::error::DomainError;
use crate::ports::ids::IdGenerator;
use crate::ports::kv::KeyValueStore;
use crate::store::PRODUCTS_KEY;

/// A monetization link (digital product, affiliate offer).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

pub fn coerce_product(raw: &Value, ids: &dyn IdGenerator) -> Product {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| ids.generate());
    let title = raw
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or("Untitled")
        .to_string();
    let link = raw
        .get("link")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let price = raw
        .get("price")
        .and_then(Value::as_f64)
        .filter(|price| price.is_finite());
    Product {
        id,
        title,
        link,
        price,
    }
}

/// Product list under one key; saves are upsert-by-id, append order
/// preserved for new entries.
#[derive(Clone)]
pub struct ProductStore {
    kv: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
}

impl ProductStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { kv, ids }
    }

    pub async fn list(&self) -> DomainResult<Vec<Product>> {
        let Some(raw) = self.kv.get(PRODUCTS_KEY).await? else {
            return Ok(Vec::new());
        };
        let Ok(Value::Array(records)) = serde_json::from_str::<Value>(&raw) else {
            return Ok(Vec::new());
        };
        Ok(records
            .iter()
            .map(|record| coerce_product(record, self.ids.as_ref()))
            .collect())
    }

    pub async fn save(&self, raw: &Value) -> DomainResult<Product> {
        let product = coerce_product(raw, self.ids.as_ref());
        let mut products = self.list().await?;
        products.retain(|existing| existing.id != product.id);
        products.push(product.clone());
        self.write_all(&products).await?;
        Ok(product)
    }

    pub async fn remove(&self, id: &str) -> DomainResult<bool> {
        let mut products = self.list().await?;
        let before = products.len();
        products.retain(|product| product.id != id);
        let removed = products.len() != before;
        if removed {
            self.write_all(&products).await?;
        }
        Ok(removed)
    }

    async fn write_all(&self, products: &[Product]) -> DomainResult<()> {
        let payload = serde_json::to_string(products)
            .map_err(|err| DomainError::Storage(err.to_string()))?;
        self.kv.set(PRODUCTS_KEY, payload).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn generate(&self) -> String {
            "prod-1".to_string()
        }
    }

    #[test]
    fn coerce_product_defaults_missing_fields() {
        let product = coerce_product(&json!({"link": "https://example.com"}), &FixedIds);
        assert_eq!(product.id, "prod-1");
        assert_eq!(product.title, "Untitled");
        assert_eq!(product.link, "https://example.com");
        assert_eq!(product.price, None);
    }

    #[test]
    fn coerce_product_drops_non_finite_price() {
        let product = coerce_product(&json!({"title": "Guide", "price": "free"}), &FixedIds);
        assert_eq!(product.price, None);
    }
}
