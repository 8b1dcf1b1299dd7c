// Catalog wire models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub creation_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub images: Vec<String>,
    pub creation_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: i64,
    pub images: Vec<String>,
}

/// Partial payload for updating a product
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Query filters for the product listing
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub title: Option<String>,
    pub category_slug: Option<String>,
    pub price_min: Option<u64>,
    pub price_max: Option<u64>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl ProductFilter {
    // parameter naming on the wire is mixed-case, matching the backend
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if let Some(title) = &self.title {
            query.push(("title", title.clone()));
        }
        if let Some(slug) = &self.category_slug {
            query.push(("categorySlug", slug.clone()));
        }
        if let Some(min) = self.price_min {
            query.push(("price_min", min.to_string()));
        }
        if let Some(max) = self.price_max {
            query.push(("price_max", max.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }

        query
    }
}

/// Response for a single uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUpload {
    pub originalname: String,
    pub filename: String,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_deserialization() {
        let body = json!({
            "id": 4,
            "title": "Handmade Fresh Table",
            "slug": "handmade-fresh-table",
            "price": 687,
            "description": "Andy shoes are designed to keeping in mind durability",
            "category": {
                "id": 5,
                "name": "Others",
                "slug": "others",
                "image": "https://placehold.co/600x400",
                "creationAt": "2023-01-03T10:30:00.000Z",
                "updatedAt": "2023-01-03T10:30:00.000Z"
            },
            "images": ["https://placehold.co/600x400"],
            "creationAt": "2023-01-03T10:30:00.000Z",
            "updatedAt": "2023-01-03T10:30:00.000Z"
        });

        let product: Product = serde_json::from_value(body).unwrap();
        assert_eq!(product.id, 4);
        assert_eq!(product.price, 687.0);
        assert_eq!(product.category.slug, "others");
        assert_eq!(product.images.len(), 1);
    }

    #[test]
    fn test_create_product_uses_camel_case_category_id() {
        let create = CreateProduct {
            title: "New Product".to_string(),
            price: 10.0,
            description: "A description".to_string(),
            category_id: 1,
            images: vec!["https://placehold.co/600x400".to_string()],
        };

        let body = serde_json::to_value(&create).unwrap();
        assert_eq!(body["categoryId"], 1);
        assert!(body.get("category_id").is_none());
    }

    #[test]
    fn test_update_product_skips_unset_fields() {
        let update = UpdateProduct {
            price: Some(25.0),
            ..Default::default()
        };

        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({ "price": 25.0 }));
    }

    #[test]
    fn test_filter_to_query() {
        let filter = ProductFilter {
            title: Some("shoes".to_string()),
            category_slug: Some("clothes".to_string()),
            price_min: Some(10),
            price_max: Some(100),
            offset: Some(20),
            limit: Some(10),
        };

        let query = filter.to_query();
        assert_eq!(
            query,
            vec![
                ("title", "shoes".to_string()),
                ("categorySlug", "clothes".to_string()),
                ("price_min", "10".to_string()),
                ("price_max", "100".to_string()),
                ("offset", "20".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_filter_yields_no_query() {
        assert!(ProductFilter::default().to_query().is_empty());
    }
}
