use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductCatalog;
use crate::domain::product::ProductView;
use crate::schema::{categories, products};

use super::models::{CategoryRow, NewCategoryRow, NewProductRow, ProductRow};

pub struct DieselCatalog {
    pool: DbPool,
}

impl DieselCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a category. Catalog authoring happens through the management
    /// CLI, not the storefront API.
    pub fn create_category(
        &self,
        name: &str,
        slug: &str,
        description: &str,
    ) -> Result<CategoryRow, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::insert_into(categories::table)
            .values(&NewCategoryRow {
                id: Uuid::new_v4(),
                name: name.to_string(),
                slug: slug.to_string(),
                description: description.to_string(),
            })
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row)
    }

    /// Insert an active product under an existing category.
    pub fn create_product(
        &self,
        category_id: Uuid,
        title: &str,
        slug: &str,
        description: &str,
        price: BigDecimal,
        inventory: i32,
    ) -> Result<ProductView, DomainError> {
        let mut conn = self.pool.get()?;
        let row: ProductRow = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: Uuid::new_v4(),
                category_id,
                title: title.to_string(),
                slug: slug.to_string(),
                description: description.to_string(),
                price,
                inventory,
                is_active: true,
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(ProductView::from(row))
    }
}

impl ProductCatalog for DieselCatalog {
    fn find(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(ProductView::from))
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(ProductView::from).collect())
    }

    fn list_products(&self, query: Option<&str>) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        let mut q = products::table
            .select(ProductRow::as_select())
            .order(products::title.asc())
            .into_boxed();
        if let Some(needle) = query {
            q = q.filter(products::title.ilike(format!("%{needle}%")));
        }
        let rows = q.load(&mut conn)?;
        Ok(rows.into_iter().map(ProductView::from).collect())
    }

    fn set_inventory(&self, id: Uuid, inventory: i32) -> Result<ProductView, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::update(products::table.find(id))
            .set(products::inventory.eq(inventory))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        row.map(ProductView::from).ok_or(DomainError::NotFound)
    }

    fn add_inventory(&self, id: Uuid, delta: i32) -> Result<ProductView, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::update(products::table.find(id))
            .set(products::inventory.eq(products::inventory + delta))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        row.map(ProductView::from).ok_or(DomainError::NotFound)
    }
}
