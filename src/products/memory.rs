use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{NewProduct, Product, ProductChanges};
use super::repo::ProductRepo;
use crate::error::StoreError;

#[derive(Default)]
pub struct MemoryProductRepo {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryProductRepo {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect(&self, keep: impl Fn(&Product) -> bool) -> Vec<Product> {
        let mut out: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| keep(*p))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

#[async_trait]
impl ProductRepo for MemoryProductRepo {
    async fn list_approved(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.collect(|p| p.is_approved).await)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Product>, StoreError> {
        Ok(self.collect(|p| p.owner_id == owner_id).await)
    }

    async fn insert(&self, new: NewProduct) -> Result<Product, StoreError> {
        let product = Product {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            price: new.price,
            quantity: new.quantity,
            is_approved: false,
            owner_id: new.owner_id,
            created_at: OffsetDateTime::now_utc(),
        };
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(p) if p.owner_id == owner_id => {
                changes.apply(p);
                Ok(Some(p.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError> {
        let mut products = self.products.write().await;
        match products.get(&id) {
            Some(p) if p.owner_id == owner_id => {
                products.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        Ok(products.get_mut(&id).map(|p| {
            p.is_approved = approved;
            p.clone()
        }))
    }
}
