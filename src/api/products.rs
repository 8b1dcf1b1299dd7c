// Product endpoints

use super::Api;
use crate::error::Result;
use crate::models::{CreateProduct, Product, ProductFilter, UpdateProduct};

impl Api {
    /// List products with optional filters and pagination
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let request = self
            .http
            .client()
            .get(self.endpoint("/products"))
            .query(&filter.to_query())
            .build()?;

        let response = self.http.execute(request).await?;
        Self::parse(response).await
    }

    /// Fetch a single product by id
    pub async fn product(&self, id: i64) -> Result<Product> {
        let request = self
            .http
            .client()
            .get(self.endpoint(&format!("/products/{id}")))
            .build()?;

        let response = self.http.execute(request).await?;
        Self::parse(response).await
    }

    /// Create a product
    pub async fn create_product(&self, product: &CreateProduct) -> Result<Product> {
        let request = self
            .http
            .client()
            .post(self.endpoint("/products"))
            .json(product)
            .build()?;

        let response = self.http.execute(request).await?;
        Self::parse(response).await
    }

    /// Update a product
    pub async fn update_product(&self, id: i64, update: &UpdateProduct) -> Result<Product> {
        let request = self
            .http
            .client()
            .put(self.endpoint(&format!("/products/{id}")))
            .json(update)
            .build()?;

        let response = self.http.execute(request).await?;
        Self::parse(response).await
    }

    /// Delete a product; the backend answers with a bare boolean
    pub async fn delete_product(&self, id: i64) -> Result<bool> {
        let request = self
            .http
            .client()
            .delete(self.endpoint(&format!("/products/{id}")))
            .build()?;

        let response = self.http.execute(request).await?;
        Self::parse(response).await
    }
}
