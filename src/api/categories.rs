// Category endpoints

use super::Api;
use crate::error::Result;
use crate::models::Category;

impl Api {
    /// List all categories
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let request = self
            .http
            .client()
            .get(self.endpoint("/categories"))
            .build()?;

        let response = self.http.execute(request).await?;
        Self::parse(response).await
    }
}
