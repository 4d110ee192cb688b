use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{NewProduct, Product, ProductChanges};
use crate::error::StoreError;

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list_approved(&self) -> Result<Vec<Product>, StoreError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Product>, StoreError>;
    async fn insert(&self, new: NewProduct) -> Result<Product, StoreError>;
    /// `None` both when the product is missing and when someone else owns it.
    async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError>;
    /// Returns `false` when nothing was deleted.
    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError>;
    /// Ownership-independent; `None` when the id is unknown.
    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<Option<Product>, StoreError>;
}

#[derive(Clone)]
pub struct PgProductRepo {
    db: PgPool,
}

impl PgProductRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepo for PgProductRepo {
    async fn list_approved(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, quantity, is_approved, owner_id, created_at
              FROM products
             WHERE is_approved = TRUE
             ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, quantity, is_approved, owner_id, created_at
              FROM products
             WHERE owner_id = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, new: NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, quantity, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, price, quantity, is_approved, owner_id, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.quantity)
        .bind(new.owner_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
               SET name        = COALESCE($3, name),
                   description = COALESCE($4, description),
                   price       = COALESCE($5, price),
                   quantity    = COALESCE($6, quantity)
             WHERE id = $1 AND owner_id = $2
            RETURNING id, name, description, price, quantity, is_approved, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.quantity)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM products WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
               SET is_approved = $2
             WHERE id = $1
            RETURNING id, name, description, price, quantity, is_approved, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(approved)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
